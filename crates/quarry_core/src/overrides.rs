//! Per-dialect view overrides.

use crate::{FilterPatch, FromItem, Limit, SelectSpec};
use serde::{Deserialize, Deserializer, Serialize};

/// How override select items combine with the base select list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    /// Patch base items matched by alias, append the rest
    #[default]
    Merge,
    /// Use the override list as the whole select list
    Replace,
}

/// Patch applied to a view when it runs against a given dialect.
///
/// Every field is optional; an absent field is not overridden. For `order_by`
/// and `limit` an explicit `null` is kept apart from an absent key: it clears
/// the base value.
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
pub struct Override {
    /// Filter patches, merged by id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filters: Option<Vec<FilterPatch>>,
    /// Select patches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    select: Option<Vec<SelectSpec>>,
    /// How `select` combines with the base list
    #[serde(default)]
    select_mode: SelectMode,
    /// Replacement ORDER BY list; `Some(None)` removes the ordering
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    order_by: Option<Option<Vec<String>>>,
    /// Replacement limit; `Some(None)` removes the limit
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    limit: Option<Option<Limit>>,
    /// Replacement connection name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connection: Option<String>,
    /// Replacement from/join graph
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    from_items: Option<Vec<FromItem>>,
}

/// Marks a key as present, so `null` becomes `Some(None)` instead of `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
