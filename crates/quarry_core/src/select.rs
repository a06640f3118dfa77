//! Select list items.

use quarry_error::{ViewError, ViewErrorKind, ViewResult};
use serde::{Deserialize, Serialize};

/// Kinds of select item a view may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SelectKind {
    /// Raw SQL expression
    Column,
    /// Reference into the catalog expression table
    Expr,
    /// Aggregate function call
    Agg,
}

/// Select item as written in a view or an override.
///
/// Every field is optional so an override can patch a single field of a base
/// item matched by alias. The typed [`SelectItem`] is obtained with
/// [`SelectSpec::resolve`] once all patches are applied.
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
#[setters(prefix = "with_", strip_option, into)]
pub struct SelectSpec {
    /// `column`, `expr` or `agg`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    /// Output alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    /// Display label, preferred over the alias as a header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// Raw SQL expression (`column`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expr: Option<String>,
    /// Catalog expression reference (`expr`)
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    /// Aggregate function name (`agg`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    func: Option<String>,
    /// Aggregate arguments (`agg`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    args: Option<Vec<String>>,
    /// Aggregate over distinct values (`agg`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distinct: Option<bool>,
}

impl SelectSpec {
    /// Shallow merge: every field present in `patch` replaces the field here.
    pub fn patched(&self, patch: &SelectSpec) -> SelectSpec {
        SelectSpec {
            kind: patch.kind.clone().or_else(|| self.kind.clone()),
            alias: patch.alias.clone().or_else(|| self.alias.clone()),
            label: patch.label.clone().or_else(|| self.label.clone()),
            expr: patch.expr.clone().or_else(|| self.expr.clone()),
            reference: patch.reference.clone().or_else(|| self.reference.clone()),
            func: patch.func.clone().or_else(|| self.func.clone()),
            args: patch.args.clone().or_else(|| self.args.clone()),
            distinct: patch.distinct.or(self.distinct),
        }
    }

    /// Header shown for this item: the label if given, else the alias.
    pub fn header(&self) -> Option<&str> {
        self.label.as_deref().or(self.alias.as_deref())
    }

    /// Resolve into a typed select item.
    ///
    /// # Errors
    ///
    /// - `UnknownSelectKind` when `kind` is absent or unrecognized
    /// - `InvalidSelectItem` when a field the kind requires is missing
    pub fn resolve(&self) -> ViewResult<SelectItem> {
        let kind_name = self.kind.as_deref().unwrap_or_default();
        let kind: SelectKind = kind_name
            .parse()
            .map_err(|_| ViewError::new(ViewErrorKind::UnknownSelectKind(kind_name.to_string())))?;

        let alias = self.require(self.alias.as_ref(), "alias")?;
        let label = self.label.clone();

        Ok(match kind {
            SelectKind::Column => SelectItem::Column {
                expr: self.require(self.expr.as_ref(), "expr")?,
                alias,
                label,
            },
            SelectKind::Expr => SelectItem::Expr {
                reference: self.require(self.reference.as_ref(), "ref")?,
                alias,
                label,
            },
            SelectKind::Agg => SelectItem::Agg {
                func: self.require(self.func.as_ref(), "func")?,
                args: self.args.clone().unwrap_or_default(),
                distinct: self.distinct.unwrap_or(false),
                alias,
                label,
            },
        })
    }

    fn require(&self, value: Option<&String>, field: &'static str) -> ViewResult<String> {
        value.cloned().ok_or_else(|| {
            ViewError::new(ViewErrorKind::InvalidSelectItem {
                alias: self.alias.clone().unwrap_or_else(|| "?".to_string()),
                field,
            })
        })
    }
}

/// A fully specified select item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    /// `<expr> AS <alias>`
    Column {
        /// Raw SQL expression, used verbatim
        expr: String,
        /// Output alias
        alias: String,
        /// Optional display label
        label: Option<String>,
    },
    /// Catalog expression rendered with the active dialect's template
    Expr {
        /// Catalog reference name
        reference: String,
        /// Output alias
        alias: String,
        /// Optional display label
        label: Option<String>,
    },
    /// `FUNC([DISTINCT ]args) AS <alias>`
    Agg {
        /// Function name, uppercased when rendered
        func: String,
        /// Argument expressions
        args: Vec<String>,
        /// Whether to aggregate distinct values
        distinct: bool,
        /// Output alias
        alias: String,
        /// Optional display label
        label: Option<String>,
    },
}

impl SelectItem {
    /// Output alias.
    pub fn alias(&self) -> &str {
        match self {
            SelectItem::Column { alias, .. }
            | SelectItem::Expr { alias, .. }
            | SelectItem::Agg { alias, .. } => alias,
        }
    }

    /// Header: label if given, else alias.
    pub fn header(&self) -> &str {
        match self {
            SelectItem::Column { label, alias, .. }
            | SelectItem::Expr { label, alias, .. }
            | SelectItem::Agg { label, alias, .. } => label.as_deref().unwrap_or(alias),
        }
    }
}
