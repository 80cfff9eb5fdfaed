//! Named tables built from consolidated and detail rows

use polars::prelude::{Column, DataFrame};
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

use crate::Result;
use crate::app::models::{Cell, ConsolidatedRow, DetailRow};
use crate::constants::{CONSOLIDATED_TABLE_SUFFIX, DETAIL_TABLE_SUFFIX};

/// A named table of cells with ordered column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Storage type chosen for one output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at a row and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.rows.get(row).and_then(|cells| cells.get(index))
    }

    fn column_kind(&self, index: usize) -> ColumnKind {
        let mut kind = None;
        for cell in self.rows.iter().filter_map(|row| row.get(index)) {
            kind = match (kind, cell) {
                (_, Cell::Empty) => kind,
                (_, Cell::Text(_)) => return ColumnKind::Text,
                (None | Some(ColumnKind::Integer), Cell::Integer(_)) => Some(ColumnKind::Integer),
                (_, Cell::Integer(_) | Cell::Decimal(_)) => Some(ColumnKind::Float),
            };
        }
        kind.unwrap_or(ColumnKind::Text)
    }

    /// Convert to a polars DataFrame
    ///
    /// Integer-only columns become Int64, numeric columns with decimals
    /// become Float64 and everything else is String. Empty cells are null.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len());

        for (index, name) in self.columns.iter().enumerate() {
            let cells = self.rows.iter().map(|row| row.get(index));
            let column = match self.column_kind(index) {
                ColumnKind::Integer => {
                    let values: Vec<Option<i64>> = cells
                        .map(|cell| match cell {
                            Some(Cell::Integer(value)) => Some(*value),
                            _ => None,
                        })
                        .collect();
                    Column::new(name.as_str().into(), values)
                }
                ColumnKind::Float => {
                    let values: Vec<Option<f64>> = cells
                        .map(|cell| match cell {
                            Some(Cell::Decimal(value)) => value.to_f64(),
                            Some(Cell::Integer(value)) => Some(*value as f64),
                            _ => None,
                        })
                        .collect();
                    Column::new(name.as_str().into(), values)
                }
                ColumnKind::Text => {
                    let values: Vec<Option<String>> = cells
                        .map(|cell| match cell {
                            None | Some(Cell::Empty) => None,
                            Some(other) => Some(other.to_string()),
                        })
                        .collect();
                    Column::new(name.as_str().into(), values)
                }
            };
            columns.push(column);
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// One `<FAMILY>_CONSOLIDADO` table per family, in family code order
pub fn consolidated_tables<'a, I>(rows: I) -> Vec<Table>
where
    I: IntoIterator<Item = &'a ConsolidatedRow>,
{
    let mut tables: BTreeMap<String, Table> = BTreeMap::new();

    for row in rows {
        let table = tables.entry(row.family.clone()).or_insert_with(|| {
            Table::new(
                format!("{}{}", row.family, CONSOLIDATED_TABLE_SUFFIX),
                row.columns.iter().map(|(name, _)| name.clone()).collect(),
            )
        });

        let cells = table
            .columns
            .iter()
            .map(|column| row.get(column).cloned().unwrap_or(Cell::Empty))
            .collect();
        table.rows.push(cells);
    }

    tables.into_values().collect()
}

/// One `<TYPE>_DETALHE` table per record type, in type code order
///
/// Columns are `LINE`, `PARENT_LINE`, the union of field names in
/// first-seen order, then `FINDINGS`.
pub fn detail_tables<'a, I>(rows: I) -> Vec<Table>
where
    I: IntoIterator<Item = &'a DetailRow>,
{
    let mut grouped: BTreeMap<&str, Vec<&DetailRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.record_type.as_str()).or_default().push(row);
    }

    grouped
        .into_iter()
        .map(|(record_type, rows)| {
            let mut fields: Vec<&str> = Vec::new();
            for row in &rows {
                for (name, _) in &row.columns {
                    if !fields.contains(&name.as_str()) {
                        fields.push(name.as_str());
                    }
                }
            }

            let mut columns = vec!["LINE".to_string(), "PARENT_LINE".to_string()];
            columns.extend(fields.iter().map(|f| f.to_string()));
            columns.push("FINDINGS".to_string());

            let mut table = Table::new(format!("{}{}", record_type, DETAIL_TABLE_SUFFIX), columns);
            for row in rows {
                let mut cells = Vec::with_capacity(fields.len() + 3);
                cells.push(Cell::Integer(row.line_number as i64));
                cells.push(
                    row.parent_line
                        .map(|line| Cell::Integer(line as i64))
                        .unwrap_or(Cell::Empty),
                );
                for field in &fields {
                    let cell = row
                        .columns
                        .iter()
                        .find(|(name, _)| name == field)
                        .map(|(_, cell)| cell.clone())
                        .unwrap_or(Cell::Empty);
                    cells.push(cell);
                }
                cells.push(if row.findings.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(row.findings.clone())
                });
                table.rows.push(cells);
            }
            table
        })
        .collect()
}
