//! Tests for per-column filter state.

use quarry_core::{ResultSet, ScalarValue};
use quarry_filter::{ColumnFilters, FilterRule};

fn people() -> ResultSet {
    ResultSet::new(
        vec!["name".to_string(), "age".to_string(), "joined".to_string()],
        vec![
            vec!["Alice".into(), 34.into(), "2023-05-01".into()],
            vec!["Bob".into(), 19.into(), "2024-02-11".into()],
            vec!["Anna".into(), ScalarValue::Null, "2024-07-30".into()],
            vec!["Carl".into(), 61.into(), ScalarValue::Null],
        ],
    )
}

fn names(result: &ResultSet) -> Vec<String> {
    result.rows().iter().map(|r| r[0].to_string()).collect()
}

#[test]
fn test_no_filters_keeps_everything() {
    let filters = ColumnFilters::new();
    assert!(filters.is_empty());
    assert_eq!(filters.apply(&people()), people());
}

#[test]
fn test_single_column_filter() {
    let mut filters = ColumnFilters::new();
    filters.set(0, "re:^a");
    assert_eq!(names(&filters.apply(&people())), vec!["Alice", "Anna"]);
}

#[test]
fn test_filters_combine_with_and() {
    let mut filters = ColumnFilters::new();
    filters.set(0, "a");
    filters.set(1, ">= 20");
    assert_eq!(filters.len(), 2);
    // Anna has no age, so the numeric rule rejects her
    assert_eq!(names(&filters.apply(&people())), vec!["Alice", "Carl"]);
}

#[test]
fn test_date_filter_on_column() {
    let mut filters = ColumnFilters::new();
    let rule = filters.set(2, ">= 2024-01-01").cloned();
    assert!(matches!(rule, Some(FilterRule::DateCompare { .. })));
    assert_eq!(names(&filters.apply(&people())), vec!["Bob", "Anna"]);
}

#[test]
fn test_empty_expression_clears_column() {
    let mut filters = ColumnFilters::new();
    filters.set(0, "bob");
    assert!(filters.rule(0).is_some());

    assert!(filters.set(0, "   ").is_none());
    assert!(filters.rule(0).is_none());
    assert_eq!(filters.apply(&people()).row_count(), 4);
}

#[test]
fn test_clear_and_clear_all() {
    let mut filters = ColumnFilters::new();
    filters.set(0, "a");
    filters.set(1, "> 100");
    assert_eq!(filters.apply(&people()).row_count(), 0);

    filters.clear(1);
    assert_eq!(filters.apply(&people()).row_count(), 3);

    filters.clear_all();
    assert!(filters.is_empty());
    assert_eq!(filters.apply(&people()).row_count(), 4);
}

#[test]
fn test_missing_cells_read_as_empty() {
    let mut filters = ColumnFilters::new();
    filters.set(5, "");
    filters.set(5, "x");
    assert!(!filters.accepts_row(&[ScalarValue::from("a")]));

    filters.set(5, "date:");
    assert!(filters.accepts_row(&[ScalarValue::from("a")]));
}

#[test]
fn test_filtering_keeps_columns() {
    let mut filters = ColumnFilters::new();
    filters.set(0, "nobody");
    let filtered = filters.apply(&people());
    assert_eq!(filtered.row_count(), 0);
    assert_eq!(filtered.columns(), people().columns());
}
