//! Grouping rows by a field value

use ahash::AHashMap;
use tabula_core::Row;

/// Bucket name for rows whose group value is empty or false-y
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Rows sharing one group key, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup<'a> {
    pub key: String,
    pub rows: Vec<&'a Row>,
}

impl RowGroup<'_> {
    /// Number of rows in the group
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the group has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partition rows by the stringified value of `field_id`
///
/// Groups appear in the order their key is first seen. Null, empty text,
/// zero, `false` and empty lists all land in [`UNCATEGORIZED`].
pub fn group_rows<'a, I>(rows: I, field_id: &str) -> Vec<RowGroup<'a>>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut groups: Vec<RowGroup<'a>> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();

    for row in rows {
        let key = group_key(row, field_id);
        match index.get(&key) {
            Some(&i) => groups[i].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(RowGroup {
                    key,
                    rows: vec![row],
                });
            }
        }
    }

    groups
}

/// The group a row belongs to when grouping by `field_id`
pub fn group_key(row: &Row, field_id: &str) -> String {
    let value = row.get(field_id);
    if value.is_falsy() {
        UNCATEGORIZED.to_string()
    } else {
        value.to_string()
    }
}
