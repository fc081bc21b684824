//! # tabula-core
//!
//! Core data structures for the tabula table engine.
//!
//! This crate provides the fundamental types shared by the formula evaluator,
//! the relation resolver and the row query engine:
//! - [`CellValue`] - A stored or derived cell value, with its coercion rules
//! - [`Field`], [`FieldType`] - Column definitions and type-specific configuration
//! - [`Row`], [`Table`], [`View`] - The records, their owner and saved views
//! - [`TableRegistry`] - Read-only table lookup by id for relation traversal
//!
//! Nothing here creates, persists or deletes data on its own; the host owns
//! the lifecycle and hands snapshots to the computation crates.
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{CellValue, Field, Row, Table};
//!
//! let table = Table::new("tasks", "Tasks")
//!     .with_field(Field::text("title", "Title"))
//!     .with_field(Field::number("hours", "Hours"))
//!     .with_row(Row::new("r1").with_cell("title", "Write docs").with_cell("hours", 3.0));
//!
//! let row = table.row("r1").unwrap();
//! assert_eq!(row.get("hours"), &CellValue::Number(3.0));
//! assert_eq!(row.get("missing"), &CellValue::Null);
//! ```

pub mod cell;
pub mod error;
pub mod field;
pub mod row;
pub mod table;
pub mod view;

pub use cell::{format_number, parse_number, CellValue, LIST_SEPARATOR};
pub use error::{Error, Result};
pub use field::{
    AggregationKind, Field, FieldKind, FieldType, FormulaConfig, LookupConfig, RelationConfig,
    RollupConfig,
};
pub use row::Row;
pub use table::{Database, Table, TableRegistry};
pub use view::{Filter, FilterOperator, Sort, SortDirection, View};
