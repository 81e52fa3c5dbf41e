//! Client-side models for the CPTcore `parse/cpt` and `classify/*` endpoints.
//!
//! The caller fetches both JSON bodies and hands them to
//! [`SoilProperties::from_api_response`]; the result exposes the CPT and
//! layer tables (as Arrow record batches) and a plot [`Figure`](plot::Figure)
//! that can be written as PNG or SVG or shown in the desktop viewer.
//!
//! ```no_run
//! use cptcore::{PlotConfig, SoilProperties};
//!
//! # fn main() -> cptcore::Result<()> {
//! let parse = cptcore::data::loader::read_json("response_parse.json".as_ref())?;
//! let classify = cptcore::data::loader::read_json("response_classify.json".as_ref())?;
//! let soil = SoilProperties::from_api_response(&parse, &classify)?;
//!
//! let layers = soil.layer_table().to_record_batch()?;
//! println!("{}", cptcore::data::table::pretty_format(&layers)?);
//! cptcore::plot::save_figure(&soil.figure(&PlotConfig::default()), "fig.png".as_ref())?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod plot;
pub mod state;
pub mod ui;

pub use config::{Config, PlotConfig, ValidationConfig};
pub use data::location::{Location, RdCoordinate};
pub use data::model::{CptSample, CptTable, Layer, LayerTable, MainComponent, SoilProperties};
pub use error::{Error, Result, ValidationError};
