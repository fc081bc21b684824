//! Relation, lookup and rollup resolution
//!
//! Resolution is total: missing tables, rows or configuration yield null (or
//! an empty link set) instead of an error.

use crate::aggregate::aggregate;
use tabula_core::{
    CellValue, Field, FieldType, RelationConfig, Row, TableRegistry, LIST_SEPARATOR,
};

/// Compute the display value of `field` for `row`
///
/// - Relation: the stored link ids as a list, or null when there are none
/// - Lookup: the target field of the linked rows; one link gives the raw
///   value, several give the stringified values joined with `", "`
/// - Rollup: the linked values reduced by the configured aggregation
/// - Anything else: the stored cell, unchanged
pub fn resolve_relation<R>(
    row: &Row,
    field: &Field,
    registry: &R,
    current_table_fields: &[Field],
) -> CellValue
where
    R: TableRegistry + ?Sized,
{
    match &field.field_type {
        FieldType::Relation(_) => {
            let ids = linked_ids(row.get(&field.id));
            if ids.is_empty() {
                CellValue::Null
            } else {
                CellValue::List(ids)
            }
        }
        FieldType::Lookup(config) => {
            let Some(values) = linked_values(
                row,
                &config.relation_field_id,
                &config.target_field_id,
                registry,
                current_table_fields,
            ) else {
                return CellValue::Null;
            };
            join_lookup(values)
        }
        FieldType::Rollup(config) => {
            let Some(values) = linked_values(
                row,
                &config.relation_field_id,
                &config.target_field_id,
                registry,
                current_table_fields,
            ) else {
                return CellValue::Null;
            };
            aggregate(&values, config.aggregation)
        }
        _ => row.get(&field.id).clone(),
    }
}

/// Rows of `target_table_id` whose ids appear in `ids`, in `ids` order
///
/// Ids that match no row are skipped; an unknown table yields no rows.
pub fn get_related_rows<'a, R>(
    registry: &'a R,
    target_table_id: &str,
    ids: &[String],
) -> Vec<&'a Row>
where
    R: TableRegistry + ?Sized,
{
    let Some(table) = registry.table(target_table_id) else {
        log::trace!("relation target table {} not found", target_table_id);
        return Vec::new();
    };

    ids.iter().filter_map(|id| table.row(id)).collect()
}

/// Normalize a stored relation cell to a list of row ids
///
/// A lone scalar becomes a one-element list; null and empty text become an
/// empty list.
pub fn linked_ids(value: &CellValue) -> Vec<String> {
    match value {
        CellValue::List(ids) => ids.clone(),
        CellValue::Null => Vec::new(),
        CellValue::Text(s) if s.is_empty() => Vec::new(),
        other => vec![other.to_string()],
    }
}

/// The relation configuration behind `relation_field_id`, if it is one
fn relation_config<'f>(fields: &'f [Field], relation_field_id: &str) -> Option<&'f RelationConfig> {
    match fields.iter().find(|f| f.id == relation_field_id) {
        Some(Field {
            field_type: FieldType::Relation(config),
            ..
        }) => Some(config),
        Some(_) => {
            log::trace!("field {} is not a relation", relation_field_id);
            None
        }
        None => {
            log::trace!("relation field {} not found", relation_field_id);
            None
        }
    }
}

/// Target field values of every row linked through the relation field
fn linked_values<R>(
    row: &Row,
    relation_field_id: &str,
    target_field_id: &str,
    registry: &R,
    current_table_fields: &[Field],
) -> Option<Vec<CellValue>>
where
    R: TableRegistry + ?Sized,
{
    let config = relation_config(current_table_fields, relation_field_id)?;
    let ids = linked_ids(row.get(relation_field_id));

    Some(
        get_related_rows(registry, &config.target_table_id, &ids)
            .into_iter()
            .map(|related| related.get(target_field_id).clone())
            .collect(),
    )
}

fn join_lookup(mut values: Vec<CellValue>) -> CellValue {
    match values.len() {
        0 => CellValue::Null,
        1 => values.pop().unwrap_or_default(),
        _ => CellValue::Text(
            values
                .iter()
                .map(CellValue::to_string)
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
        ),
    }
}
