//! Fetched tabular results.

use crate::ScalarValue;
use serde::{Deserialize, Serialize};

/// Rows fetched for a compiled view, with named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ResultSet {
    /// Column names in select order
    columns: Vec<String>,
    /// Row values, one inner vector per row
    rows: Vec<Vec<ScalarValue>>,
}

impl ResultSet {
    /// Create a result set from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<ScalarValue>>) -> Self {
        Self { columns, rows }
    }

    /// Result with columns and no rows.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at a row and column; `None` when out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&ScalarValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// New result set holding only the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> ResultSet {
        ResultSet {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}
