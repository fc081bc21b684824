//! Tables and the table registry used for relation traversal

use crate::error::{Error, Result};
use crate::field::Field;
use crate::row::Row;
use crate::view::View;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// A table: ordered fields, rows and views
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub id: String,
    pub name: String,
    pub fields: Vec<Field>,
    pub rows: Vec<Row>,
    pub views: Vec<View>,
}

impl Table {
    /// Create an empty table
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style field append
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Builder-style row append
    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Builder-style view append
    pub fn with_view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    /// Find a field by id
    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Find a field by exact (case-sensitive) name
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Like [`Table::field_by_name`], failing with [`Error::FieldNotFound`]
    pub fn require_field(&self, name: &str) -> Result<&Field> {
        self.field_by_name(name).ok_or_else(|| Error::FieldNotFound(name.to_string()))
    }

    /// Find a row by id
    pub fn row(&self, row_id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == row_id)
    }

    /// Find a view by id
    pub fn view(&self, view_id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id == view_id)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Read-only lookup of tables by id
///
/// Relation traversal goes through a registry rather than holding references
/// between tables.
pub trait TableRegistry {
    /// Get a table by id
    fn table(&self, table_id: &str) -> Option<&Table>;
}

impl<S: BuildHasher> TableRegistry for HashMap<String, Table, S> {
    fn table(&self, table_id: &str) -> Option<&Table> {
        self.get(table_id)
    }
}

impl TableRegistry for [Table] {
    fn table(&self, table_id: &str) -> Option<&Table> {
        self.iter().find(|t| t.id == table_id)
    }
}

impl TableRegistry for Vec<Table> {
    fn table(&self, table_id: &str) -> Option<&Table> {
        self.as_slice().table(table_id)
    }
}

impl<T: TableRegistry + ?Sized> TableRegistry for &T {
    fn table(&self, table_id: &str) -> Option<&Table> {
        (**self).table(table_id)
    }
}

/// A set of tables addressable by id
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Database {
    tables: Vec<Table>,
}

impl Database {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table. Table ids must be unique.
    pub fn add_table(&mut self, table: Table) -> Result<()> {
        if self.tables.iter().any(|t| t.id == table.id) {
            return Err(Error::DuplicateTable(table.id));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Builder-style table registration
    pub fn with_table(mut self, table: Table) -> Result<Self> {
        self.add_table(table)?;
        Ok(self)
    }

    /// Get a table by id, failing if absent
    pub fn get(&self, table_id: &str) -> Result<&Table> {
        self.table(table_id)
            .ok_or_else(|| Error::TableNotFound(table_id.to_string()))
    }

    /// All tables in registration order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Number of tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl TableRegistry for Database {
    fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.table(table_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    fn projects() -> Table {
        Table::new("projects", "Projects")
            .with_field(Field::text("name", "Name"))
            .with_field(Field::number("budget", "Budget"))
            .with_row(Row::new("p1").with_cell("name", "Alpha"))
    }

    #[test]
    fn test_field_lookup() {
        let table = projects();
        assert_eq!(table.field("budget").map(|f| f.name.as_str()), Some("Budget"));
        assert_eq!(table.field_by_name("Name").map(|f| f.id.as_str()), Some("name"));
        assert!(table.field_by_name("name").is_none());
        assert!(table.require_field("Budget").is_ok());
        assert!(matches!(
            table.require_field("Cost"),
            Err(Error::FieldNotFound(name)) if name == "Cost"
        ));
        assert_eq!(table.row("p1").map(|r| r.get("name")), Some(&CellValue::text("Alpha")));
    }

    #[test]
    fn test_database_registry() {
        let mut db = Database::new();
        db.add_table(projects()).unwrap();
        assert!(matches!(
            db.add_table(projects()),
            Err(Error::DuplicateTable(id)) if id == "projects"
        ));
        assert!(db.table("projects").is_some());
        assert!(matches!(db.get("tasks"), Err(Error::TableNotFound(_))));
    }

    #[test]
    fn test_map_and_slice_registries() {
        let mut map = HashMap::new();
        map.insert("projects".to_string(), projects());
        assert!(map.table("projects").is_some());

        let tables = vec![projects()];
        assert!(tables.table("projects").is_some());
        assert!(tables.as_slice().table("nope").is_none());
    }
}
