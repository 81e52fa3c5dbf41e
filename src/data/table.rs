use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, StringArray};
use arrow::compute::filter_record_batch;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

use crate::color::to_hex;
use crate::error::{Error, Result};

use super::model::{CptTable, LayerTable};

// ---------------------------------------------------------------------------
// Arrow projections
// ---------------------------------------------------------------------------

fn float_column<I>(values: I) -> ArrayRef
where
    I: IntoIterator<Item = Option<f64>>,
{
    Arc::new(values.into_iter().collect::<Float64Array>())
}

fn text_column<'a, I>(values: I) -> ArrayRef
where
    I: IntoIterator<Item = &'a str>,
{
    Arc::new(StringArray::from_iter_values(values))
}

impl LayerTable {
    /// Column names of [`LayerTable::to_record_batch`], API columns first.
    pub const COLUMNS: [&'static str; 14] = [
        "geotechnicalSoilName",
        "lowerBoundary",
        "upperBoundary",
        "color",
        "mainComponent",
        "cohesion",
        "gamma_sat",
        "gamma_unsat",
        "phi",
        "undrainedShearStrength",
        "upperElevation",
        "lowerElevation",
        "meanConeResistance",
        "meanFrictionRatio",
    ];

    /// One row per layer, in table order. Soil properties stay nullable.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let layers = self.layers();
        let colors: Vec<String> = layers.iter().map(|l| to_hex(l.color)).collect();

        let columns: Vec<ArrayRef> = vec![
            text_column(layers.iter().map(|l| l.geotechnical_soil_name.as_str())),
            float_column(layers.iter().map(|l| Some(l.lower_boundary))),
            float_column(layers.iter().map(|l| Some(l.upper_boundary))),
            text_column(colors.iter().map(String::as_str)),
            text_column(layers.iter().map(|l| l.main_component.as_str())),
            float_column(layers.iter().map(|l| l.cohesion)),
            float_column(layers.iter().map(|l| l.gamma_sat)),
            float_column(layers.iter().map(|l| l.gamma_unsat)),
            float_column(layers.iter().map(|l| l.phi)),
            float_column(layers.iter().map(|l| l.undrained_shear_strength)),
            float_column(layers.iter().map(|l| Some(l.upper_elevation))),
            float_column(layers.iter().map(|l| Some(l.lower_elevation))),
            float_column(layers.iter().map(|l| l.mean_cone_resistance)),
            float_column(layers.iter().map(|l| l.mean_friction_ratio)),
        ];

        let fields: Vec<Field> = Self::COLUMNS
            .iter()
            .zip(&columns)
            .enumerate()
            .map(|(i, (name, col))| {
                // soil properties and the CPT means may be missing
                let nullable = matches!(i, 5..=9 | 12 | 13);
                Field::new(*name, col.data_type().clone(), nullable)
            })
            .collect();

        Ok(RecordBatch::try_new(
            Arc::new(Schema::new(fields)),
            columns,
        )?)
    }
}

impl CptTable {
    pub const COLUMNS: [&'static str; 5] = [
        "penetrationLength",
        "depthOffset",
        "coneResistance",
        "localFriction",
        "frictionRatio",
    ];

    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let samples = self.samples();
        let columns: Vec<ArrayRef> = vec![
            float_column(samples.iter().map(|s| Some(s.penetration_length))),
            float_column(samples.iter().map(|s| s.depth_offset)),
            float_column(samples.iter().map(|s| s.cone_resistance)),
            float_column(samples.iter().map(|s| s.local_friction)),
            float_column(samples.iter().map(|s| s.friction_ratio)),
        ];
        let fields: Vec<Field> = Self::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, name)| Field::new(*name, DataType::Float64, i > 0))
            .collect();

        Ok(RecordBatch::try_new(
            Arc::new(Schema::new(fields)),
            columns,
        )?)
    }
}

// ---------------------------------------------------------------------------
// Views and export
// ---------------------------------------------------------------------------

/// Keep only rows without any null cell.
pub fn drop_incomplete(batch: &RecordBatch) -> Result<RecordBatch> {
    let mask: BooleanArray = (0..batch.num_rows())
        .map(|row| Some(batch.columns().iter().all(|col| col.is_valid(row))))
        .collect();
    let kept = filter_record_batch(batch, &mask)?;
    if kept.num_rows() < batch.num_rows() {
        log::debug!(
            "Dropped {} incomplete row(s)",
            batch.num_rows() - kept.num_rows()
        );
    }
    Ok(kept)
}

/// Render as an ASCII table.
pub fn pretty_format(batch: &RecordBatch) -> Result<String> {
    Ok(pretty_format_batches(std::slice::from_ref(batch))?.to_string())
}

/// Write a header row plus one record per row; nulls become empty cells.
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let schema = batch.schema();
    writer.write_record(schema.fields().iter().map(|f| f.name().as_str()))?;

    for row in 0..batch.num_rows() {
        let record = batch
            .columns()
            .iter()
            .map(|col| array_value_to_string(col, row))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;

    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}

pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;

    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}

/// Dispatch by extension: `.csv`, `.parquet` / `.pq`. Anything else is
/// [`Error::UnsupportedFormat`] and nothing is written.
pub fn write_table(batch: &RecordBatch, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(batch, path),
        "parquet" | "pq" => write_parquet(batch, path),
        _ => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            expected: ".csv, .parquet or .pq",
        }),
    }
}
