//! Row types

use crate::cell::CellValue;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A record of a table
///
/// Cells are keyed by field id. A missing key reads as [`CellValue::Null`], and
/// keys for fields that no longer exist in the table are kept as-is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Row id, unique within its table
    pub id: String,
    /// Field id -> value
    pub cells: HashMap<String, CellValue>,
    /// When the row was created
    pub created_at: DateTime<Utc>,
    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

static NULL: CellValue = CellValue::Null;

impl Row {
    /// Create an empty row stamped with the current time
    pub fn new<S: Into<String>>(id: S) -> Self {
        let now = Utc::now();
        Self::with_timestamps(id, now, now)
    }

    /// Create an empty row with explicit timestamps
    pub fn with_timestamps<S: Into<String>>(
        id: S,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            cells: HashMap::new(),
            created_at,
            updated_at,
        }
    }

    /// Builder-style cell assignment
    pub fn with_cell<K: Into<String>, V: Into<CellValue>>(mut self, field_id: K, value: V) -> Self {
        self.set(field_id, value);
        self
    }

    /// Get a cell value; absent cells read as null
    pub fn get(&self, field_id: &str) -> &CellValue {
        self.cells.get(field_id).unwrap_or(&NULL)
    }

    /// Set a cell value
    pub fn set<K: Into<String>, V: Into<CellValue>>(&mut self, field_id: K, value: V) {
        self.cells.insert(field_id.into(), value.into());
    }

    /// Whether the row has a stored entry for the field
    pub fn has(&self, field_id: &str) -> bool {
        self.cells.contains_key(field_id)
    }
}
