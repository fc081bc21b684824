//! Aggregation functions used by rollups
//!
//! All reducers are total: empty input and odd values never fail.

use tabula_core::{AggregationKind, CellValue};

/// Reduce `values` with the aggregation named `kind`
///
/// Unknown names yield null.
///
/// # Example
/// ```rust
/// use tabula_core::CellValue;
/// use tabula_relation::aggregate_values;
///
/// let values = [CellValue::Number(1.0), CellValue::Number(2.0), CellValue::Null];
/// assert_eq!(aggregate_values(&values, "count"), CellValue::Number(3.0));
/// assert_eq!(aggregate_values(&[], "avg"), CellValue::Number(0.0));
/// assert_eq!(aggregate_values(&[], "min"), CellValue::Null);
/// assert_eq!(aggregate_values(&values, "median"), CellValue::Null);
/// ```
pub fn aggregate_values(values: &[CellValue], kind: &str) -> CellValue {
    match kind.parse::<AggregationKind>() {
        Ok(kind) => aggregate(values, kind),
        Err(_) => CellValue::Null,
    }
}

/// Reduce `values` with a typed aggregation
pub fn aggregate(values: &[CellValue], kind: AggregationKind) -> CellValue {
    match kind {
        AggregationKind::Count => CellValue::Number(values.len() as f64),
        AggregationKind::Sum => CellValue::Number(sum(values)),
        AggregationKind::Avg => {
            if values.is_empty() {
                CellValue::Number(0.0)
            } else {
                CellValue::Number(sum(values) / values.len() as f64)
            }
        }
        AggregationKind::Min => values
            .iter()
            .map(CellValue::to_number)
            .reduce(f64::min)
            .into(),
        AggregationKind::Max => values
            .iter()
            .map(CellValue::to_number)
            .reduce(f64::max)
            .into(),
        AggregationKind::PercentEmpty => percent(values, |v| v.is_blank()),
        AggregationKind::PercentFilled => percent(values, |v| !v.is_blank()),
    }
}

fn sum(values: &[CellValue]) -> f64 {
    values.iter().map(CellValue::to_number).sum()
}

/// Rounded integer percentage of values matching `pred`; 0 for no values
fn percent(values: &[CellValue], pred: impl Fn(&CellValue) -> bool) -> CellValue {
    if values.is_empty() {
        return CellValue::Number(0.0);
    }
    let matching = values.iter().filter(|v| pred(v)).count();
    CellValue::Number((matching as f64 / values.len() as f64 * 100.0).round())
}
