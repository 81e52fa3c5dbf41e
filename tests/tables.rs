//! Arrow projections and table export.

mod common;

use arrow::array::{Array, AsArray};
use arrow::datatypes::Float64Type;
use cptcore::data::table::{drop_incomplete, pretty_format, write_csv, write_parquet, write_table};
use cptcore::{CptTable, Error, LayerTable};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

#[test]
fn layer_batch_has_one_row_per_layer() {
    let soil = common::soil();
    let batch = soil.layer_table().to_record_batch().unwrap();

    assert_eq!(batch.num_rows(), soil.layer_table().len());
    let names: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(names, LayerTable::COLUMNS);

    let cohesion = batch.column(5).as_primitive::<Float64Type>();
    assert!(cohesion.is_null(0));
    assert_eq!(cohesion.value(1), 2.0);

    let colors = batch.column(3).as_string::<i32>();
    assert_eq!(colors.value(0), "#f5e08c");

    let components = batch.column(4).as_string::<i32>();
    assert_eq!(components.value(2), "peat");
}

#[test]
fn drop_incomplete_mirrors_dataframe_dropna() {
    let soil = common::soil();

    // the sand layer has no cohesion or undrained shear strength
    let layers = drop_incomplete(&soil.layer_table().to_record_batch().unwrap()).unwrap();
    assert_eq!(layers.num_rows(), 2);
    assert_eq!(layers.column(0).as_string::<i32>().value(0), "Klei, zwak zandig");

    // two samples miss local friction
    let cpt = drop_incomplete(&soil.cpt_table().to_record_batch().unwrap()).unwrap();
    assert_eq!(cpt.num_rows(), 19);
    assert_eq!(cpt.num_columns(), CptTable::COLUMNS.len());
}

#[test]
fn pretty_format_lists_every_layer() {
    let soil = common::soil();
    let text = pretty_format(&soil.layer_table().to_record_batch().unwrap()).unwrap();
    for layer in soil.layer_table() {
        assert!(text.contains(&layer.geotechnical_soil_name));
    }
    assert!(text.contains("geotechnicalSoilName"));
}

#[test]
fn csv_export_writes_header_and_rows() {
    let soil = common::soil();
    let batch = soil.layer_table().to_record_batch().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layers.csv");

    write_csv(&batch, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, LayerTable::COLUMNS);

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][0], "Zand, schoon");
    assert_eq!(&records[0][5], "", "null cohesion is an empty cell");
    assert_eq!(&records[2][4], "peat");
}

#[test]
fn parquet_export_round_trips_row_count() {
    let soil = common::soil();
    let batch = soil.cpt_table().to_record_batch().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cpt.parquet");

    write_parquet(&batch, &path).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(Result::unwrap).collect();
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 21);
    let friction = batches[0].column(3);
    assert_eq!(friction.null_count(), 2);
}

#[test]
fn write_table_dispatches_on_extension() {
    let soil = common::soil();
    let batch = soil.layer_table().to_record_batch().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("layers.csv");
    write_table(&batch, &csv_path).unwrap();
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(text.starts_with("geotechnicalSoilName,"));

    let pq_path = dir.path().join("layers.pq");
    write_table(&batch, &pq_path).unwrap();
    let magic = std::fs::read(&pq_path).unwrap();
    assert_eq!(&magic[..4], b"PAR1");
}

#[test]
fn write_table_rejects_unknown_extensions() {
    let soil = common::soil();
    let batch = soil.layer_table().to_record_batch().unwrap();
    let dir = tempfile::tempdir().unwrap();

    for name in ["layers.xlsx", "layers"] {
        let path = dir.path().join(name);
        match write_table(&batch, &path) {
            Err(Error::UnsupportedFormat { path: p, .. }) => assert_eq!(p, path),
            other => panic!("{name}: unexpected {other:?}"),
        }
        assert!(!path.exists(), "{name} should not be created");
    }
}
