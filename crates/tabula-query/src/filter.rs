//! Row filtering
//!
//! Filters compare the stringified cell (lists joined with `", "`) against the
//! filter's text value. A row survives only if it passes every filter.

use tabula_core::{parse_number, Filter, FilterOperator, Row};

/// Rows that satisfy all `filters`, in their original order
///
/// An empty filter list keeps every row.
pub fn apply_filters<'a, I>(rows: I, filters: &[Filter]) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    rows.into_iter()
        .filter(|row| filters.iter().all(|filter| matches_filter(row, filter)))
        .collect()
}

/// Whether a single row passes a single filter
pub fn matches_filter(row: &Row, filter: &Filter) -> bool {
    let cell = row.get(&filter.field_id);
    let text = cell.to_string();

    match filter.operator {
        FilterOperator::Is => text == filter.value,
        FilterOperator::IsNot => text != filter.value,
        FilterOperator::Contains => contains_ignore_case(&text, &filter.value),
        FilterOperator::NotContains => !contains_ignore_case(&text, &filter.value),
        FilterOperator::IsEmpty => text.is_empty(),
        FilterOperator::IsNotEmpty => !text.is_empty(),
        FilterOperator::Gt => cell.to_number() > parse_number(&filter.value),
        FilterOperator::Lt => cell.to_number() < parse_number(&filter.value),
        FilterOperator::Unknown => true,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
