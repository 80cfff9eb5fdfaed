//! Tests for CSV and Parquet sinks

use super::*;
use crate::app::services::tabular_export::{
    CsvSink, ParquetSink, TabularSink, sink_for, tables_from_outcome,
};
use crate::config::TableFormat;
use polars::prelude::*;
use std::fs::File;
use tempfile::TempDir;

#[test]
fn test_csv_sink_writes_readable_files() {
    let dir = TempDir::new().unwrap();
    let tables = tables_from_outcome(&sample_outcome(), true);

    let paths = CsvSink::new(dir.path()).write_tables(&tables).unwrap();
    assert_eq!(paths.len(), tables.len());

    for (table, path) in tables.iter().zip(&paths) {
        assert_eq!(path, &dir.path().join(format!("{}.csv", table.name)));
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.clone()))
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(df.height(), table.len(), "row count of {}", table.name);
        assert_eq!(df.width(), table.columns.len(), "columns of {}", table.name);
    }
}

#[test]
fn test_parquet_sink_writes_readable_files() {
    let dir = TempDir::new().unwrap();
    let tables = tables_from_outcome(&sample_outcome(), true);

    let paths = ParquetSink::new(dir.path()).write_tables(&tables).unwrap();

    let consolidated = paths
        .iter()
        .find(|p| p.ends_with("C_CONSOLIDADO.parquet"))
        .unwrap();
    let df = ParquetReader::new(File::open(consolidated).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), 1);
    assert_eq!(
        df.column("C170_VL_ITEM_SUM").unwrap().dtype(),
        &DataType::Float64
    );
    assert_eq!(
        df.column("C170_VL_ITEM_SUM").unwrap().f64().unwrap().get(0),
        Some(150.0)
    );
    assert_eq!(df.column("CHILD_COUNT").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_sink_for_format() {
    let dir = TempDir::new().unwrap();
    let tables = tables_from_outcome(&sample_outcome(), false);

    let path = sink_for(TableFormat::Parquet, dir.path())
        .write_table(&tables[0])
        .unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("parquet"));

    let path = sink_for(TableFormat::Csv, dir.path())
        .write_table(&tables[0])
        .unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
}

#[test]
fn test_missing_output_directory_is_an_error() {
    let tables = tables_from_outcome(&sample_outcome(), false);
    let result = CsvSink::new("/nonexistent/output/dir").write_table(&tables[0]);

    match result {
        Err(crate::Error::Io { .. }) => {}
        other => panic!("Expected Io error, got {:?}", other),
    }
}
