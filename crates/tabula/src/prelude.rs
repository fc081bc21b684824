//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    // Query engine
    apply_filters,
    apply_sorts,
    group_rows,
    search_rows,

    // Formulas
    evaluate_formula,
    is_error_value,

    // Relations
    aggregate_values,
    get_related_rows,
    resolve_relation,

    // Calculation and views
    compute_row,
    compute_rows,
    run_view,
    visible_fields,
    CalculationOptions,
    CalculationStats,
    TableCalculationExt,

    // Model types
    AggregationKind,
    CellValue,
    Database,
    Error,
    Field,
    FieldType,
    Filter,
    FilterOperator,
    Result,
    Row,
    Sort,
    SortDirection,
    Table,
    TableRegistry,
    View,
};
