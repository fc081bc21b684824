//! Multi-key stable sorting

use std::cmp::Ordering;
use tabula_core::{Field, Row, Sort, SortDirection};

/// Sort rows by each key in turn; later keys only break ties
///
/// Number fields compare numerically, everything else compares the
/// stringified cell with [`locale_compare`]. The sort is stable, so rows with
/// equal keys (and every row, for an empty key list) keep their input order.
pub fn apply_sorts<'a, I>(rows: I, sorts: &[Sort], fields: &[Field]) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut rows: Vec<&Row> = rows.into_iter().collect();
    if sorts.is_empty() {
        return rows;
    }

    let keys: Vec<(&Sort, bool)> = sorts
        .iter()
        .map(|sort| {
            let numeric = fields
                .iter()
                .find(|f| f.id == sort.field_id)
                .map_or(false, |f| f.kind().is_numeric());
            (sort, numeric)
        })
        .collect();

    rows.sort_by(|a, b| {
        keys.iter()
            .map(|(sort, numeric)| compare_key(a, b, sort, *numeric))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Compare two rows on a single sort key
pub fn compare_rows(a: &Row, b: &Row, sort: &Sort, fields: &[Field]) -> Ordering {
    let numeric = fields
        .iter()
        .find(|f| f.id == sort.field_id)
        .map_or(false, |f| f.kind().is_numeric());
    compare_key(a, b, sort, numeric)
}

fn compare_key(a: &Row, b: &Row, sort: &Sort, numeric: bool) -> Ordering {
    let a = a.get(&sort.field_id);
    let b = b.get(&sort.field_id);

    let ord = if numeric {
        a.to_number().total_cmp(&b.to_number())
    } else {
        locale_compare(&a.to_string(), &b.to_string())
    };

    match sort.direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Human-oriented string ordering
///
/// Letters compare case-insensitively first; among strings that differ only
/// in case, lowercase sorts before uppercase (`"apple" < "Apple" < "banana"`).
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded.is_ne() {
        return folded;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return x.cmp(&y),
        }
    }

    a.len().cmp(&b.len())
}
