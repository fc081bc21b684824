//! # tabula-query
//!
//! The row query engine behind table views: filtering, multi-key stable
//! sorting, free-text search and grouping.
//!
//! Every operation borrows its input rows and returns references in the
//! resulting order. Rows are never modified.
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{Field, Filter, FilterOperator, Row, Sort};
//! use tabula_query::{apply_filters, apply_sorts};
//!
//! let fields = vec![Field::text("name", "Name"), Field::number("age", "Age")];
//! let rows = vec![
//!     Row::new("1").with_cell("name", "Ada").with_cell("age", 36.0),
//!     Row::new("2").with_cell("name", "Grace").with_cell("age", 85.0),
//!     Row::new("3").with_cell("name", "Alan").with_cell("age", 41.0),
//! ];
//!
//! let adults = apply_filters(&rows, &[Filter::new("age", FilterOperator::Gt, "40")]);
//! let sorted = apply_sorts(adults, &[Sort::asc("name")], &fields);
//! let names: Vec<String> = sorted.iter().map(|r| r.get("name").to_string()).collect();
//! assert_eq!(names, vec!["Alan", "Grace"]);
//! ```

pub mod filter;
pub mod group;
pub mod search;
pub mod sort;

pub use filter::{apply_filters, matches_filter};
pub use group::{group_key, group_rows, RowGroup, UNCATEGORIZED};
pub use search::{row_matches, search_rows};
pub use sort::{apply_sorts, compare_rows, locale_compare};
