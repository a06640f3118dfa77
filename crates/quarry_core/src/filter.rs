//! View filters and their per-dialect patches.

use crate::{RuntimeParams, ScalarValue};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Which clause a filter condition lands in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Clause {
    /// `WHERE`
    #[default]
    Where,
    /// `HAVING`
    Having,
}

impl Clause {
    /// Parse a clause name case-insensitively; anything but `having` is `where`.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("having") {
            Clause::Having
        } else {
            Clause::Where
        }
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Clause {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(Clause::from_name).unwrap_or_default())
    }
}

/// Default value(s) of a filter's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterDefault {
    /// Per-parameter defaults keyed by parameter id
    PerParam(BTreeMap<String, ScalarValue>),
    /// One value, used only when the filter has exactly one parameter
    Scalar(ScalarValue),
}

impl FilterDefault {
    /// Default for `param`, given how many parameters the filter declares.
    pub fn value_for(&self, param: &str, param_count: usize) -> ScalarValue {
        match self {
            FilterDefault::PerParam(map) => map.get(param).cloned().unwrap_or_default(),
            FilterDefault::Scalar(value) if param_count == 1 => value.clone(),
            FilterDefault::Scalar(_) => ScalarValue::Null,
        }
    }
}

/// A named, optionally parameterized WHERE/HAVING fragment.
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
pub struct Filter {
    /// Filter id, unique within a view
    #[setters(into)]
    id: String,
    /// Parameter ids in placeholder order; `[id]` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(strip_option)]
    param_order: Option<Vec<String>>,
    /// SQL condition template with positional placeholders
    #[serde(rename = "where")]
    #[setters(into)]
    condition: String,
    /// Default value(s)
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    #[setters(strip_option)]
    default_value: Option<FilterDefault>,
    /// Active even without runtime parameters
    #[serde(default)]
    enabled: bool,
    /// Target clause
    #[serde(default)]
    clause: Clause,
    /// Display label (presentation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// Widget type for every parameter (presentation only)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    widget_type: Option<String>,
    /// Widget type per parameter id (presentation only)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    types: BTreeMap<String, String>,
    /// Choices for enum widgets (presentation only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    choices: Vec<serde_json::Value>,
}

impl Filter {
    /// Parameter ids in placeholder order.
    pub fn params(&self) -> Vec<String> {
        match &self.param_order {
            Some(order) => order.clone(),
            None => vec![self.id.clone()],
        }
    }

    /// Whether the filter participates in a run with these parameters.
    ///
    /// A disabled filter is activated by supplying any of its parameters.
    pub fn is_active(&self, params: &RuntimeParams) -> bool {
        self.enabled || self.params().iter().any(|p| params.contains_key(p))
    }

    /// One value per parameter id: the runtime value when present and not
    /// null, otherwise the default.
    pub fn resolve_values(&self, params: &RuntimeParams) -> Vec<ScalarValue> {
        let ids = self.params();
        let count = ids.len();
        ids.iter()
            .map(|id| match params.get(id) {
                Some(value) if !value.is_null() => value.clone(),
                _ => self
                    .default_value
                    .as_ref()
                    .map(|d| d.value_for(id, count))
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Shallow merge: every field present in `patch` replaces the field here.
    pub fn patched(&self, patch: &FilterPatch) -> Filter {
        Filter {
            id: patch.id.clone(),
            param_order: patch.param_order.clone().or_else(|| self.param_order.clone()),
            condition: patch.condition.clone().unwrap_or_else(|| self.condition.clone()),
            default_value: patch
                .default_value
                .clone()
                .or_else(|| self.default_value.clone()),
            enabled: patch.enabled.unwrap_or(self.enabled),
            clause: patch.clause.unwrap_or(self.clause),
            label: patch.label.clone().or_else(|| self.label.clone()),
            widget_type: patch.widget_type.clone().or_else(|| self.widget_type.clone()),
            types: patch.types.clone().unwrap_or_else(|| self.types.clone()),
            choices: patch.choices.clone().unwrap_or_else(|| self.choices.clone()),
        }
    }
}

/// Per-dialect patch of a filter, matched to base filters by id.
///
/// Absent fields leave the base filter's value in place.
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
pub struct FilterPatch {
    /// Id of the filter to patch, or of the filter to append
    id: String,
    /// Replacement parameter order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    param_order: Option<Vec<String>>,
    /// Replacement condition
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    /// Replacement default value(s)
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    default_value: Option<FilterDefault>,
    /// Replacement enabled flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    /// Replacement clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clause: Option<Clause>,
    /// Replacement label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// Replacement widget type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    widget_type: Option<String>,
    /// Replacement per-parameter widget types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    types: Option<BTreeMap<String, String>>,
    /// Replacement choices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choices: Option<Vec<serde_json::Value>>,
}

impl FilterPatch {
    /// Turn an override-only patch into a standalone filter.
    ///
    /// Returns `None` when the patch carries no condition.
    pub fn to_filter(&self) -> Option<Filter> {
        let condition = self.condition.clone()?;
        let base = Filter {
            id: self.id.clone(),
            condition,
            ..Filter::default()
        };
        Some(base.patched(self))
    }
}
