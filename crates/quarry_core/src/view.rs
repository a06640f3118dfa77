//! Declarative view definitions.

use crate::{Filter, Override, SelectSpec};
use quarry_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument};

/// Join clause of a from-item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Join {
    /// Join type (`LEFT`, `INNER`, ...); `INNER` when absent
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    /// Join condition
    on: String,
}

impl Join {
    /// Create a join of the given type on a condition.
    pub fn new(kind: Option<String>, on: impl Into<String>) -> Self {
        Self {
            kind,
            on: on.into(),
        }
    }

    /// Join type keyword, defaulting to `INNER`.
    pub fn join_type(&self) -> &str {
        self.kind.as_deref().unwrap_or("INNER")
    }
}

/// A table in the from/join graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct FromItem {
    /// Table name (may be schema qualified)
    table: String,
    /// Table alias
    alias: String,
    /// Join clause; absent on the base table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    join: Option<Join>,
}

impl FromItem {
    /// Base table without a join clause.
    pub fn base(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            join: None,
        }
    }

    /// Joined table.
    pub fn joined(table: impl Into<String>, alias: impl Into<String>, join: Join) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            join: Some(join),
        }
    }
}

/// Row limit with optional offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Limit {
    /// Maximum number of rows
    rows: u64,
    /// Rows to skip; only rendered by the `limit` style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
}

impl Limit {
    /// Create a limit.
    pub fn new(rows: u64, offset: Option<u64>) -> Self {
        Self { rows, offset }
    }
}

/// Declarative, parameterizable definition of a tabular query.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct View {
    /// Unique view id
    #[setters(into)]
    id: String,
    /// Connection name; the catalog default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(strip_option, into)]
    connection: Option<String>,
    /// Select list
    #[serde(default)]
    select: Vec<SelectSpec>,
    /// Base table followed by joins
    #[serde(rename = "from", default)]
    from_items: Vec<FromItem>,
    /// Filters in declaration order
    #[serde(default)]
    filters: Vec<Filter>,
    /// GROUP BY columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    group_by: Vec<String>,
    /// ORDER BY columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<String>,
    /// Row limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<Limit>,
    /// Per-dialect overrides keyed by dialect name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    overrides: BTreeMap<String, Override>,
}

impl View {
    /// Override registered for a dialect, if any.
    pub fn override_for(&self, dialect: &str) -> Option<&Override> {
        self.overrides.get(dialect)
    }
}

/// Ordered collection of views with lookup by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSet {
    views: Vec<View>,
}

/// Accepted document shapes: `{"views": [...]}` or `{"view": {...}}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ViewDocument {
    Single { view: View },
    Many { views: Vec<View> },
}

impl ViewSet {
    /// Build a view set; later views with an already seen id are dropped.
    pub fn new(views: impl IntoIterator<Item = View>) -> Self {
        let mut out: Vec<View> = Vec::new();
        for view in views {
            if out.iter().any(|v| v.id == view.id) {
                debug!(view_id = %view.id, "Dropping view with duplicate id");
                continue;
            }
            out.push(view);
        }
        Self { views: out }
    }

    /// Parse a views document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a views document.
    #[instrument(skip(json), fields(json_len = json.len()))]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let doc: ViewDocument = serde_json::from_str(json).map_err(|e| {
            ConfigError::new(format!(
                "Views document must hold 'view' or 'views': {}",
                e
            ))
        })?;
        let set = match doc {
            ViewDocument::Single { view } => Self::new([view]),
            ViewDocument::Many { views } => Self::new(views),
        };
        debug!(views = set.len(), "Parsed views document");
        Ok(set)
    }

    /// Load a views document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read views file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Look up a view by id.
    pub fn get(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    /// Views in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    /// Number of views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the set holds no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
