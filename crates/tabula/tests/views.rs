//! End-to-end tests: a view over a table with relations and formulas

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tabula::prelude::*;

fn database() -> Database {
    let clients = Table::new("clients", "Clients")
        .with_field(Field::text("name", "Name"))
        .with_field(Field::text("tier", "Tier"))
        .with_row(Row::new("c1").with_cell("name", "Acme").with_cell("tier", "Gold"))
        .with_row(Row::new("c2").with_cell("name", "Initech"));

    Database::new().with_table(clients).unwrap()
}

fn projects() -> Table {
    Table::new("projects", "Projects")
        .with_field(Field::text("name", "Name"))
        .with_field(Field::number("hours", "Hours"))
        .with_field(Field::number("rate", "Rate"))
        .with_field(Field::relation("client", "Client", "clients", false))
        .with_field(Field::lookup("client_name", "Client Name", "client", "name"))
        .with_field(Field::formula("cost", "Cost", "{Hours} * {Rate}"))
        .with_field(Field::formula(
            "summary",
            "Summary",
            "CONCAT({Name}, ' for ', {Client Name})",
        ))
        .with_field(Field::formula("late", "Late", "DAYS(TODAY(), '2024-01-01') > 30"))
        .with_row(
            Row::new("p1")
                .with_cell("name", "Website")
                .with_cell("hours", 10.0)
                .with_cell("rate", 100.0)
                .with_cell("client", CellValue::list(["c1"])),
        )
        .with_row(
            Row::new("p2")
                .with_cell("name", "Audit")
                .with_cell("hours", 4.0)
                .with_cell("rate", 150.0)
                .with_cell("client", "c2"),
        )
        .with_row(
            Row::new("p3")
                .with_cell("name", "Internal")
                .with_cell("hours", 2.0),
        )
}

fn options() -> CalculationOptions {
    CalculationOptions {
        now: Some(Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()),
        ..Default::default()
    }
}

#[test]
fn test_view_materializes_lookups_and_formulas() {
    let db = database();
    let table = projects();
    let view = View::new("v", "By hours").with_sort(Sort::desc("hours"));

    let result = run_view(&table, &view, &db, "", &options());
    let summaries: Vec<String> = result
        .rows
        .iter()
        .map(|r| r.get("summary").to_string())
        .collect();

    assert_eq!(
        summaries,
        vec!["Website for Acme", "Audit for Initech", "Internal for "]
    );
    assert_eq!(result.rows[0].get("cost"), &CellValue::Number(1000.0));
    assert_eq!(result.rows[1].get("client"), &CellValue::list(["c2"]));
    assert_eq!(result.rows[2].get("cost"), &CellValue::Number(0.0));
    assert_eq!(result.rows[0].get("late"), &CellValue::Boolean(false));
    assert_eq!(result.stats.volatile_cells, 3);
}

#[test]
fn test_view_filters_search_and_hidden_fields() {
    let db = database();
    let table = projects();
    let view = View::new("v", "Billable")
        .with_filter(Filter::new("rate", FilterOperator::IsNotEmpty, ""))
        .with_hidden("rate")
        .with_hidden("late");

    let result = run_view(&table, &view, &db, "audit", &options());
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].id, "p2");

    let visible: Vec<&str> = result.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(
        visible,
        vec!["name", "hours", "client", "client_name", "cost", "summary"]
    );
}

#[test]
fn test_compute_rows_matches_view_rows() {
    let db = database();
    let table = projects();
    let (rows, stats) = compute_rows(&table, &table.rows, &db, &options());
    let view = run_view(&table, &View::new("v", "All"), &db, "", &options());

    assert_eq!(rows, view.rows);
    assert_eq!(stats, view.stats);
    assert_eq!(stats.rows, 3);
    assert_eq!(stats.relation_cells, 6);
    assert_eq!(stats.formula_cells, 9);
}
