//! # tabula
//!
//! Computed fields and views for embedded tables.
//!
//! Tabula evaluates the derived columns of an in-memory table and runs saved
//! views over its rows. The host owns the data; every function here reads
//! snapshots and returns new values.
//!
//! ## Features
//!
//! - Formula fields: a small expression language with field references,
//!   arithmetic, comparisons and built-in functions
//! - Relation, Lookup and Rollup fields resolved across tables
//! - Filters, multi-key stable sorts, free-text search and grouping
//! - Whole-table calculation with dependency ordering between formulas
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let fields = vec![Field::text("name", "Name")];
//! let row = Row::new("r1").with_cell("name", "hello");
//!
//! assert_eq!(evaluate_formula("LEN(UPPER({Name}))", &row, &fields), CellValue::Number(5.0));
//! assert_eq!(
//!     evaluate_formula("CONCAT({Name}, ' ', 'World')", &row, &fields),
//!     CellValue::text("hello World")
//! );
//! ```

pub mod calculation;
pub mod prelude;
pub mod view;

// Re-export calculation types
pub use calculation::{
    compute_row, compute_rows, CalculationOptions, CalculationStats, TableCalculationExt,
};
pub use view::{run_view, visible_fields, ViewGroup, ViewResult};

// Re-export core types
pub use tabula_core::{
    format_number, parse_number, AggregationKind, CellValue, Database, Error, Field, FieldKind,
    FieldType, Filter, FilterOperator, FormulaConfig, LookupConfig, RelationConfig, Result,
    RollupConfig, Row, Sort, SortDirection, Table, TableRegistry, View, LIST_SEPARATOR,
};

// Re-export formula types
pub use tabula_formula::{
    evaluate_formula, evaluate_formula_with, is_error_value, is_volatile, parse_formula,
    referenced_fields, try_evaluate_formula, ErrorKind, EvaluationContext, FormulaDependencies,
    FormulaError, FormulaExpr, FormulaResult, FormulaValue, ERROR_PREFIX,
};

// Re-export relation and aggregation functions
pub use tabula_relation::{aggregate, aggregate_values, get_related_rows, resolve_relation};

// Re-export the query engine
pub use tabula_query::{
    apply_filters, apply_sorts, compare_rows, group_key, group_rows, locale_compare,
    matches_filter, row_matches, search_rows, RowGroup, UNCATEGORIZED,
};
