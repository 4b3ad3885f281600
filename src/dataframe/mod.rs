//! Tabular containers built from fetched rows.
//!
//! Two backends are supported:
//! - `arrow` - an Apache Arrow [`RecordBatch`], columnar
//! - `rows` - a [`RowFrame`], row-major with named columns

pub mod builders;

use crate::client::{ColumnDescription, Row};
use crate::error::ConversionError;
use arrow_array::{RecordBatch, RecordBatchOptions};
use arrow_schema::{Field, Schema};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use builders::{build_array, infer_data_type};

/// Selects the container `get_df` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFrameKind {
    #[default]
    Arrow,
    Rows,
}

impl FromStr for DataFrameKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "arrow" | "pandas" => Ok(DataFrameKind::Arrow),
            "rows" | "polars" => Ok(DataFrameKind::Rows),
            other => Err(ConversionError::UnsupportedKind(other.to_string())),
        }
    }
}

impl fmt::Display for DataFrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFrameKind::Arrow => write!(f, "arrow"),
            DataFrameKind::Rows => write!(f, "rows"),
        }
    }
}

/// Row-major table with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFrame {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RowFrame {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Row at `index`.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// All values of the named column.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

/// A result set in one of the supported containers.
#[derive(Debug, Clone)]
pub enum DataFrame {
    Arrow(RecordBatch),
    Rows(RowFrame),
}

impl DataFrame {
    /// Build a container of the requested kind from cursor output.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::SchemaMismatch` if a row's width differs
    /// from the number of columns, or a value conversion error for Arrow.
    pub fn from_rows(
        kind: DataFrameKind,
        description: &[ColumnDescription],
        rows: Vec<Row>,
    ) -> Result<Self, ConversionError> {
        let num_columns = description.len();
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != num_columns {
                return Err(ConversionError::SchemaMismatch(format!(
                    "Row {} has {} columns, expected {}",
                    row_idx,
                    row.len(),
                    num_columns
                )));
            }
        }

        let columns: Vec<String> = description.iter().map(|d| d.name.clone()).collect();

        match kind {
            DataFrameKind::Arrow => Ok(DataFrame::Arrow(to_record_batch(&columns, &rows)?)),
            DataFrameKind::Rows => Ok(DataFrame::Rows(RowFrame { columns, rows })),
        }
    }

    pub fn kind(&self) -> DataFrameKind {
        match self {
            DataFrame::Arrow(_) => DataFrameKind::Arrow,
            DataFrame::Rows(_) => DataFrameKind::Rows,
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        match self {
            DataFrame::Arrow(batch) => batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect(),
            DataFrame::Rows(frame) => frame.columns.clone(),
        }
    }

    pub fn num_rows(&self) -> usize {
        match self {
            DataFrame::Arrow(batch) => batch.num_rows(),
            DataFrame::Rows(frame) => frame.height(),
        }
    }

    pub fn as_arrow(&self) -> Option<&RecordBatch> {
        match self {
            DataFrame::Arrow(batch) => Some(batch),
            DataFrame::Rows(_) => None,
        }
    }

    pub fn as_rows(&self) -> Option<&RowFrame> {
        match self {
            DataFrame::Rows(frame) => Some(frame),
            DataFrame::Arrow(_) => None,
        }
    }
}

/// Column descriptions named by position (`"0"`, `"1"`, ...), used when a
/// cursor reports no description.
pub fn positional_columns(width: usize) -> Vec<ColumnDescription> {
    (0..width)
        .map(|idx| ColumnDescription::new(&idx.to_string()))
        .collect()
}

/// Transpose row-major data and build one Arrow array per column.
fn to_record_batch(columns: &[String], rows: &[Row]) -> Result<RecordBatch, ConversionError> {
    let columns_data: Vec<Vec<Value>> = (0..columns.len())
        .map(|col| rows.iter().map(|row| row[col].clone()).collect())
        .collect();

    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays = Vec::with_capacity(columns.len());
    for (idx, (name, values)) in columns.iter().zip(&columns_data).enumerate() {
        let data_type = infer_data_type(values);
        arrays.push(build_array(&data_type, values, idx)?);
        fields.push(Field::new(name, data_type, true));
    }

    // Zero-column batches carry the row count explicitly.
    let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
        .map_err(ConversionError::from)
}
