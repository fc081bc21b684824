//! # tabula-relation
//!
//! Cross-table resolution for Relation, Lookup and Rollup fields, plus the
//! aggregation functions rollups use.
//!
//! Tables are reached through a [`TableRegistry`](tabula_core::TableRegistry)
//! passed in by the caller; nothing here holds state between calls.

pub mod aggregate;
pub mod resolver;

pub use aggregate::{aggregate, aggregate_values};
pub use resolver::{get_related_rows, linked_ids, resolve_relation};
