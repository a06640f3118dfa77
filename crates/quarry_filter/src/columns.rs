//! Per-column filter state applied to result sets.

use crate::{FilterRule, compile};
use quarry_core::{ResultSet, ScalarValue};
use std::collections::BTreeMap;
use tracing::debug;

/// Filter rules keyed by column index; a row passes when every rule matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFilters {
    rules: BTreeMap<usize, FilterRule>,
}

impl ColumnFilters {
    /// No filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `expression` for `column`. An empty expression clears the
    /// column. Returns the rule now in effect.
    pub fn set(&mut self, column: usize, expression: &str) -> Option<&FilterRule> {
        match compile(expression) {
            Some(rule) => {
                self.rules.insert(column, rule);
                self.rules.get(&column)
            }
            None => {
                self.clear(column);
                None
            }
        }
    }

    /// Remove the rule for `column`.
    pub fn clear(&mut self, column: usize) {
        if self.rules.remove(&column).is_some() {
            debug!(column, "Cleared column filter");
        }
    }

    /// Remove every rule.
    pub fn clear_all(&mut self) {
        self.rules.clear();
    }

    /// Rule for `column`, if any.
    pub fn rule(&self, column: usize) -> Option<&FilterRule> {
        self.rules.get(&column)
    }

    /// Number of filtered columns.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no column is filtered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether a row passes every rule. Missing cells read as empty text.
    pub fn accepts_row(&self, row: &[ScalarValue]) -> bool {
        self.rules.iter().all(|(&column, rule)| match row.get(column) {
            Some(value) => rule.matches_value(value),
            None => rule.matches(""),
        })
    }

    /// Rows of `result` that pass every rule, in their original order.
    pub fn apply(&self, result: &ResultSet) -> ResultSet {
        if self.rules.is_empty() {
            return result.clone();
        }
        let kept: Vec<usize> = result
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| self.accepts_row(row))
            .map(|(i, _)| i)
            .collect();
        debug!(
            rows = result.row_count(),
            kept = kept.len(),
            filters = self.rules.len(),
            "Applied column filters"
        );
        result.select_rows(&kept)
    }
}
