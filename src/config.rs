use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Config – everything a caller may tune, all fields defaulted
// ---------------------------------------------------------------------------

/// Root configuration, loadable from a JSON file.
///
/// ```json
/// { "plot": { "dpi": 150.0 }, "validation": { "depth_tolerance": 0.5 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = serde_json::from_str(&text)?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}

/// Figure layout and axis limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Figure size in inches (width, height).
    pub figsize: (f64, f64),
    /// Pixels per inch for raster output.
    pub dpi: f64,
    /// Relative widths of the CPT panel and the layer panel.
    pub width_ratios: (f64, f64),
    /// Upper limit of the cone resistance axis [MPa].
    pub cone_resistance_max: f64,
    /// Upper limit of the local friction axis [MPa].
    pub local_friction_max: f64,
    /// Upper limit of the (inverted) friction ratio axis [%].
    pub friction_ratio_max: f64,
    /// Spacing of horizontal grid lines [m].
    pub elevation_tick: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            figsize: (10.0, 12.0),
            dpi: 100.0,
            width_ratios: (1.0, 0.1),
            cone_resistance_max: 40.0,
            local_friction_max: 0.8,
            friction_ratio_max: 16.0,
            elevation_tick: 0.5,
        }
    }
}

impl PlotConfig {
    /// Raster size in whole pixels, never smaller than 1×1.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = (self.figsize.0 * self.dpi).round().max(1.0) as u32;
        let h = (self.figsize.1 * self.dpi).round().max(1.0) as u32;
        (w, h)
    }
}

/// Rules applied by the `SoilProperties` factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// How far [m] the layer boundaries may extend beyond the CPT depth range.
    pub depth_tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            depth_tolerance: 1.0,
        }
    }
}
