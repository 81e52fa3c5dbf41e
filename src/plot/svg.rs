use std::path::Path;

use plotters::prelude::*;

use crate::error::{Error, Result};

use super::chart;
use super::figure::Figure;

// ---------------------------------------------------------------------------
// SVG backend
// ---------------------------------------------------------------------------

/// Standalone SVG document with layer, axis and level annotations.
pub fn render(fig: &Figure) -> Result<String> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, (fig.width_px, fig.height_px))
            .into_drawing_area();
        chart::draw(&root, fig, true)?;
        root.present()?;
    }
    Ok(out)
}

pub fn save_svg(fig: &Figure, path: &Path) -> Result<()> {
    std::fs::write(path, render(fig)?).map_err(|e| Error::io(path, e))?;
    log::info!("Saved SVG figure to {}", path.display());
    Ok(())
}
