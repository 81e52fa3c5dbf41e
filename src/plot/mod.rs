//! Plotting: a [`Figure`] describes the CPT / soil-layer plot once, the
//! backends draw it.
//!
//! * [`raster`] – PNG through `plotters`' bitmap backend, encoded by `image`
//! * [`svg`] – standalone SVG through `plotters`' SVG backend
//! * `ui::plot` – interactive `egui_plot` view in the desktop viewer

mod chart;
pub mod figure;
pub mod raster;
pub mod svg;

use std::path::Path;

pub use figure::{Axis, Band, Figure, Layout, LevelLine, Rect, Trace};

use crate::error::Result;

/// Save by extension: `.svg` writes SVG, anything else PNG.
pub fn save_figure(fig: &Figure, path: &Path) -> Result<()> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        svg::save_svg(fig, path)
    } else {
        raster::save_png(fig, path)
    }
}
