//! View execution
//!
//! Runs a saved view over a table: filters, then sorts, then the free-text
//! search, then grouping. The surviving rows are materialized with the
//! calculation engine. The query stages read stored cell values.

use crate::calculation::{CalculationEngine, CalculationOptions, CalculationStats};
use crate::{
    apply_filters, apply_sorts, group_rows, search_rows, Field, Row, Table, TableRegistry, View,
};
use ahash::{AHashMap, AHashSet};

/// Rows sharing one group key, materialized
#[derive(Debug, Clone, PartialEq)]
pub struct ViewGroup {
    pub key: String,
    pub rows: Vec<Row>,
}

/// Output of [`run_view`]
#[derive(Debug, Clone)]
pub struct ViewResult<'t> {
    /// Visible fields in display order
    pub fields: Vec<&'t Field>,
    /// Matching rows in view order, computed cells filled in
    pub rows: Vec<Row>,
    /// Groups in first-seen order; empty when the view is not grouped
    pub groups: Vec<ViewGroup>,
    pub stats: CalculationStats,
}

/// Run `view` over `table`, narrowing the rows further by `search`
///
/// # Example
///
/// ```rust
/// use tabula::prelude::*;
///
/// let table = Table::new("tasks", "Tasks")
///     .with_field(Field::text("title", "Title"))
///     .with_field(Field::text("status", "Status"))
///     .with_row(Row::new("1").with_cell("title", "Docs").with_cell("status", "Done"))
///     .with_row(Row::new("2").with_cell("title", "Tests").with_cell("status", "Todo"))
///     .with_row(Row::new("3").with_cell("title", "Bench"));
///
/// let view = View::new("v", "By status")
///     .with_sort(Sort::asc("title"))
///     .with_group_by("status");
///
/// let result = run_view(&table, &view, &Database::new(), "", &CalculationOptions::default());
/// let keys: Vec<&str> = result.groups.iter().map(|g| g.key.as_str()).collect();
/// assert_eq!(keys, vec!["Uncategorized", "Done", "Todo"]);
/// ```
pub fn run_view<'t, R>(
    table: &'t Table,
    view: &View,
    registry: &R,
    search: &str,
    options: &CalculationOptions,
) -> ViewResult<'t>
where
    R: TableRegistry + ?Sized,
{
    let filtered = apply_filters(&table.rows, &view.filters);
    let sorted = apply_sorts(filtered, &view.sorts, &table.fields);
    let found = search_rows(sorted, search);

    let engine = CalculationEngine::new(table, options);
    let mut stats = CalculationStats {
        cyclic_fields: engine.cyclic_field_count(),
        ..Default::default()
    };

    let rows: Vec<Row> = found
        .iter()
        .map(|row| engine.compute(row, registry, &mut stats))
        .collect();

    let groups = match &view.group_by {
        Some(field_id) => {
            // stored rows -> position of their computed copy
            let position: AHashMap<*const Row, usize> = found
                .iter()
                .enumerate()
                .map(|(i, row)| (*row as *const Row, i))
                .collect();

            group_rows(found.iter().copied(), field_id)
                .into_iter()
                .map(|group| ViewGroup {
                    key: group.key,
                    rows: group
                        .rows
                        .iter()
                        .filter_map(|row| position.get(&(*row as *const Row)))
                        .map(|&i| rows[i].clone())
                        .collect(),
                })
                .collect()
        }
        None => Vec::new(),
    };

    log::debug!(
        "view {} on table {}: {} of {} rows, {} groups",
        view.id,
        table.id,
        rows.len(),
        table.rows.len(),
        groups.len()
    );

    ViewResult {
        fields: visible_fields(view, &table.fields),
        rows,
        groups,
        stats,
    }
}

/// Fields shown by `view`, in display order
///
/// Fields named in the view's field order come first, in that order; the
/// remaining fields follow in table order. Hidden fields are left out, and
/// ids that match no field are ignored.
pub fn visible_fields<'f>(view: &View, fields: &'f [Field]) -> Vec<&'f Field> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut visible = Vec::with_capacity(fields.len());

    let ordered = view
        .field_order
        .iter()
        .filter_map(|id| fields.iter().find(|f| &f.id == id));

    for field in ordered.chain(fields.iter()) {
        if view.hidden_fields.contains(&field.id) || !seen.insert(field.id.as_str()) {
            continue;
        }
        visible.push(field);
    }

    visible
}
