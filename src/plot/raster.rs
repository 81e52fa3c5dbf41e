use std::path::Path;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;

use crate::error::{Error, Result};

use super::chart;
use super::figure::Figure;

// ---------------------------------------------------------------------------
// PNG backend
// ---------------------------------------------------------------------------

/// Rasterize the figure into an RGB buffer. Text is left to the SVG and
/// on-screen backends.
pub fn render(fig: &Figure) -> Result<RgbImage> {
    let (w, h) = (fig.width_px, fig.height_px);
    let mut buf = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        chart::draw(&root, fig, false)?;
        root.present()?;
    }
    RgbImage::from_raw(w, h, buf).ok_or_else(|| Error::Plot("pixel buffer size mismatch".into()))
}

pub fn save_png(fig: &Figure, path: &Path) -> Result<()> {
    render(fig)?.save_with_format(path, ImageFormat::Png)?;
    log::info!(
        "Saved {}x{} figure to {}",
        fig.width_px,
        fig.height_px,
        path.display()
    );
    Ok(())
}
