//! Tabular export of consolidated and detail rows
//!
//! Rows are grouped into named tables (`<FAMILY>_CONSOLIDADO`,
//! `<TYPE>_DETALHE`) and written through a [`TabularSink`].
//!
//! ## Architecture
//!
//! - [`table`] - Table building and DataFrame conversion
//! - [`sinks`] - CSV and Parquet writers

pub mod sinks;
pub mod table;

#[cfg(test)]
pub mod tests;

pub use sinks::{CsvSink, ParquetSink, TabularSink, sink_for};
pub use table::{Table, consolidated_tables, detail_tables};

use crate::app::services::pipeline::{BatchOutcome, FileOutcome};

/// Tables of one file outcome: consolidated first, then details if requested
pub fn tables_from_outcome(outcome: &FileOutcome, include_details: bool) -> Vec<Table> {
    let mut tables = consolidated_tables(&outcome.consolidated);
    if include_details {
        tables.extend(detail_tables(&outcome.details));
    }
    tables
}

/// Tables of a whole batch, rows concatenated in input file order
pub fn tables_from_batch(batch: &BatchOutcome, include_details: bool) -> Vec<Table> {
    let mut tables = consolidated_tables(batch.consolidated_rows());
    if include_details {
        tables.extend(detail_tables(batch.detail_rows()));
    }
    tables
}
