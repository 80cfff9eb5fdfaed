//! CSV and Parquet table sinks backed by polars

use polars::prelude::{CsvWriter, ParquetCompression, ParquetWriter, SerWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::table::Table;
use crate::config::TableFormat;
use crate::{Error, Result};

/// Destination for named tables
pub trait TabularSink {
    /// Write one table and return the path written
    fn write_table(&self, table: &Table) -> Result<PathBuf>;

    /// Write every table in order
    fn write_tables(&self, tables: &[Table]) -> Result<Vec<PathBuf>> {
        tables.iter().map(|table| self.write_table(table)).collect()
    }
}

/// Writes each table as `<name>.csv` with a header row
#[derive(Debug, Clone)]
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl TabularSink for CsvSink {
    fn write_table(&self, table: &Table) -> Result<PathBuf> {
        let path = table_path(&self.output_dir, table, TableFormat::Csv);
        let mut df = table.to_dataframe()?;
        let mut file = create_file(&path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| {
                Error::table_export(format!("Failed to write {}", path.display()), Box::new(e))
            })?;

        debug!("Wrote {} rows to {}", table.len(), path.display());
        Ok(path)
    }
}

/// Writes each table as `<name>.parquet` with Snappy compression
#[derive(Debug, Clone)]
pub struct ParquetSink {
    output_dir: PathBuf,
    compression: ParquetCompression,
}

impl ParquetSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            compression: ParquetCompression::Snappy,
        }
    }

    pub fn with_compression(mut self, compression: ParquetCompression) -> Self {
        self.compression = compression;
        self
    }
}

impl TabularSink for ParquetSink {
    fn write_table(&self, table: &Table) -> Result<PathBuf> {
        let path = table_path(&self.output_dir, table, TableFormat::Parquet);
        let mut df = table.to_dataframe()?;
        let file = create_file(&path)?;

        ParquetWriter::new(file)
            .with_compression(self.compression)
            .finish(&mut df)
            .map_err(|e| {
                Error::table_export(format!("Failed to write {}", path.display()), Box::new(e))
            })?;

        debug!("Wrote {} rows to {}", table.len(), path.display());
        Ok(path)
    }
}

/// Sink for the configured output format
pub fn sink_for(format: TableFormat, output_dir: &Path) -> Box<dyn TabularSink + Send + Sync> {
    match format {
        TableFormat::Csv => Box::new(CsvSink::new(output_dir)),
        TableFormat::Parquet => Box::new(ParquetSink::new(output_dir)),
    }
}

fn table_path(output_dir: &Path, table: &Table, format: TableFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", table.name, format.extension()))
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))
}
