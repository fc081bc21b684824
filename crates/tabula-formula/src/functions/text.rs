//! Text functions

use super::arg;
use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};

/// CONCAT(value, ...): stringified arguments with no separator
pub fn fn_concat(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let s: String = args.iter().map(FormulaValue::as_string).collect();
    Ok(FormulaValue::String(s))
}

/// UPPER(text)
pub fn fn_upper(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::String(arg(args, 0).as_string().to_uppercase()))
}

/// LOWER(text)
pub fn fn_lower(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::String(arg(args, 0).as_string().to_lowercase()))
}

/// LEN(text): number of characters
pub fn fn_len(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let s = arg(args, 0).as_string();
    Ok(FormulaValue::Number(s.chars().count() as f64))
}

/// TRIM(text): leading and trailing whitespace removed
pub fn fn_trim(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::String(arg(args, 0).as_string().trim().to_string()))
}

#[cfg(test)]
mod tests {
    use crate::evaluate_formula;
    use tabula_core::{CellValue, Field, Row};

    fn eval(expression: &str) -> CellValue {
        let fields = vec![Field::text("name", "Name"), Field::number("n", "N")];
        let row = Row::new("r")
            .with_cell("name", "  Ada Lovelace ")
            .with_cell("n", 1.5);
        evaluate_formula(expression, &row, &fields)
    }

    #[test]
    fn test_concat() {
        assert_eq!(eval("CONCAT('a', 1, TRUE)"), CellValue::text("a1true"));
        assert_eq!(eval("CONCAT()"), CellValue::text(""));
        assert_eq!(eval("CONCAT({N}, '%')"), CellValue::text("1.5%"));
    }

    #[test]
    fn test_case() {
        assert_eq!(eval("UPPER('abc')"), CellValue::text("ABC"));
        assert_eq!(eval("LOWER('ÀBC')"), CellValue::text("àbc"));
        assert_eq!(eval("UPPER(12)"), CellValue::text("12"));
    }

    #[test]
    fn test_len() {
        assert_eq!(eval("LEN({Name})"), CellValue::Number(15.0));
        assert_eq!(eval("LEN('héllo')"), CellValue::Number(5.0));
        assert_eq!(eval("LEN(1000)"), CellValue::Number(4.0));
    }

    #[test]
    fn test_trim() {
        assert_eq!(eval("TRIM({Name})"), CellValue::text("Ada Lovelace"));
        assert_eq!(eval("LEN(TRIM({Name}))"), CellValue::Number(12.0));
    }
}
