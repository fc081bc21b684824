//! Tests for relation, lookup and rollup resolution across tables

use pretty_assertions::assert_eq;
use tabula::prelude::*;

fn database() -> Database {
    let projects = Table::new("projects", "Projects")
        .with_field(Field::text("name", "Name"))
        .with_field(Field::number("budget", "Budget"))
        .with_field(Field::text("owner", "Owner"))
        .with_row(
            Row::new("p1")
                .with_cell("name", "Alpha")
                .with_cell("budget", 1000.0)
                .with_cell("owner", "Ana"),
        )
        .with_row(
            Row::new("p2")
                .with_cell("name", "Beta")
                .with_cell("budget", 2000.0),
        );

    Database::new().with_table(projects).unwrap()
}

fn task_fields() -> Vec<Field> {
    vec![
        Field::text("title", "Title"),
        Field::relation("project", "Project", "projects", true),
        Field::lookup("project_name", "Project Name", "project", "name"),
        Field::rollup("budget", "Budget", "project", "budget", AggregationKind::Sum),
        Field::rollup("max_budget", "Max", "project", "budget", AggregationKind::Max),
        Field::rollup("avg_budget", "Avg", "project", "budget", AggregationKind::Avg),
        Field::rollup("owners", "Owners", "project", "owner", AggregationKind::PercentFilled),
    ]
}

fn resolve(row: &Row, field_id: &str) -> CellValue {
    let db = database();
    let fields = task_fields();
    let field = fields.iter().find(|f| f.id == field_id).unwrap();
    resolve_relation(row, field, &db, &fields)
}

#[test]
fn test_lookup_cardinality() {
    let none = Row::new("t");
    let one = Row::new("t").with_cell("project", CellValue::list(["p1"]));
    let two = Row::new("t").with_cell("project", CellValue::list(["p1", "p2"]));

    assert_eq!(resolve(&none, "project_name"), CellValue::Null);
    assert_eq!(resolve(&one, "project_name"), CellValue::text("Alpha"));
    assert_eq!(resolve(&two, "project_name"), CellValue::text("Alpha, Beta"));
}

#[test]
fn test_rollups() {
    let row = Row::new("t").with_cell("project", CellValue::list(["p1", "p2"]));

    assert_eq!(resolve(&row, "budget"), CellValue::Number(3000.0));
    assert_eq!(resolve(&row, "max_budget"), CellValue::Number(2000.0));
    assert_eq!(resolve(&row, "avg_budget"), CellValue::Number(1500.0));
    assert_eq!(resolve(&row, "owners"), CellValue::Number(50.0));
}

#[test]
fn test_rollups_over_no_links() {
    let row = Row::new("t");

    assert_eq!(resolve(&row, "budget"), CellValue::Number(0.0));
    assert_eq!(resolve(&row, "max_budget"), CellValue::Null);
    assert_eq!(resolve(&row, "avg_budget"), CellValue::Number(0.0));
    assert_eq!(resolve(&row, "owners"), CellValue::Number(0.0));
}

#[test]
fn test_relation_cell_is_always_a_list() {
    let row = Row::new("t").with_cell("project", "p2");
    assert_eq!(resolve(&row, "project"), CellValue::list(["p2"]));
}

#[test]
fn test_aggregation_laws() {
    assert_eq!(aggregate_values(&[], "avg"), CellValue::Number(0.0));
    assert_eq!(aggregate_values(&[], "min"), CellValue::Null);
    assert_eq!(
        aggregate_values(
            &[1.0.into(), 2.0.into(), 3.0.into(), CellValue::Null],
            "count"
        ),
        CellValue::Number(4.0)
    );
    assert_eq!(aggregate_values(&[1.0.into()], "median"), CellValue::Null);
}

#[test]
fn test_registry_implementations() {
    let db = database();
    let ids = vec!["p2".to_string(), "p1".to_string()];

    let from_db: Vec<&str> = get_related_rows(&db, "projects", &ids)
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(from_db, vec!["p2", "p1"]);

    let tables: Vec<Table> = db.tables().to_vec();
    assert_eq!(get_related_rows(&tables, "projects", &ids).len(), 2);
    assert_eq!(get_related_rows(tables.as_slice(), "projects", &ids).len(), 2);
    assert!(get_related_rows(&tables, "people", &ids).is_empty());
}
