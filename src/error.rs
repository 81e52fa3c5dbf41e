use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ValidationError – everything that can go wrong while building the model
// ---------------------------------------------------------------------------

/// Raised by the [`SoilProperties`](crate::data::model::SoilProperties)
/// factory when a payload cannot be turned into a consistent model.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required field '{field}' in {payload} response")]
    MissingField {
        payload: &'static str,
        field: &'static str,
    },

    #[error("{table}: column '{field}' has {found} values, expected {expected}")]
    LengthMismatch {
        table: &'static str,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{field}[{index}]: {reason}")]
    InvalidValue {
        field: &'static str,
        index: usize,
        reason: String,
    },

    #[error(
        "layers span {layer_top:.2}..{layer_bottom:.2} m but the CPT covers \
         {cpt_top:.2}..{cpt_bottom:.2} m (tolerance {tolerance:.2} m)"
    )]
    DepthRangeMismatch {
        layer_top: f64,
        layer_bottom: f64,
        cpt_top: f64,
        cpt_bottom: f64,
        tolerance: f64,
    },

    #[error("classification has {layers} layers but the CPT has no depth values")]
    EmptyCpt { layers: usize },

    #[error("malformed {payload} response: {source}")]
    Malformed {
        payload: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Error – crate-wide error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("image: {0}")]
    Image(#[from] image::ImageError),

    #[error("plot: {0}")]
    Plot(String),

    #[error("{path}: unsupported file extension, expected {expected}")]
    UnsupportedFormat {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("unsupported spatial reference '{0}', expected EPSG:4326")]
    UnsupportedSrs(String),
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>> for Error {
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(e.to_string())
    }
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
