//! Typed merge of per-dialect overrides into a base view.
//!
//! Every function takes its inputs by reference and returns a new value.

use quarry_core::{Filter, FilterPatch, Override, SelectMode, SelectSpec, View};
use quarry_error::{ViewError, ViewErrorKind, ViewResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Apply an override to a view, producing the effective view.
///
/// # Errors
///
/// Returns `InvalidFilter` when the override appends a filter without a condition.
pub fn apply_override(view: &View, ovr: &Override) -> ViewResult<View> {
    let mut effective = view.clone();

    if let Some(patches) = ovr.filters() {
        effective = effective.with_filters(merge_filters(view.filters(), patches)?);
    }
    if let Some(items) = ovr.select() {
        effective = effective.with_select(merge_select(view.select(), items, *ovr.select_mode()));
    }
    if let Some(order_by) = ovr.order_by() {
        effective = effective.with_order_by(order_by.clone().unwrap_or_default());
    }
    if let Some(limit) = ovr.limit() {
        effective = effective.with_limit(*limit);
    }
    if let Some(connection) = ovr.connection() {
        effective = effective.with_connection(connection.clone());
    }
    if let Some(from_items) = ovr.from_items() {
        effective = effective.with_from_items(from_items.clone());
    }

    Ok(effective)
}

/// Merge filter patches into base filters.
///
/// Base filters keep their order; a base filter with a patch of the same id is
/// replaced by the patched copy. Patches matching no base filter are appended
/// in patch order.
///
/// # Errors
///
/// Returns `InvalidFilter` when an appended patch has no condition.
pub fn merge_filters(base: &[Filter], patches: &[FilterPatch]) -> ViewResult<Vec<Filter>> {
    let base_ids: HashSet<&str> = base.iter().map(|f| f.id().as_str()).collect();
    let mut out = Vec::with_capacity(base.len() + patches.len());

    for filter in base {
        match patches.iter().find(|p| p.id() == filter.id()) {
            Some(patch) => {
                debug!(filter_id = %filter.id(), "Patching filter from override");
                out.push(filter.patched(patch));
            }
            None => out.push(filter.clone()),
        }
    }

    for patch in patches {
        if base_ids.contains(patch.id().as_str()) {
            continue;
        }
        let filter = patch
            .to_filter()
            .ok_or_else(|| ViewError::new(ViewErrorKind::InvalidFilter(patch.id().clone())))?;
        debug!(filter_id = %filter.id(), "Appending filter from override");
        out.push(filter);
    }

    Ok(out)
}

/// Merge override select items into the base select list.
///
/// `Replace` returns the override list. `Merge` patches base items whose alias
/// matches an override item and appends the others.
pub fn merge_select(base: &[SelectSpec], items: &[SelectSpec], mode: SelectMode) -> Vec<SelectSpec> {
    if mode == SelectMode::Replace {
        return items.to_vec();
    }

    let mut out = base.to_vec();
    let by_alias: HashMap<&str, usize> = base
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.alias().as_deref().map(|a| (a, i)))
        .collect();

    for item in items {
        match item.alias().as_deref().and_then(|a| by_alias.get(a)) {
            Some(&idx) => out[idx] = out[idx].patched(item),
            None => out.push(item.clone()),
        }
    }
    out
}
