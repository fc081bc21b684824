//! Math functions

use super::arg;
use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};

/// SUM(value, ...): numeric sum, coercing each argument
pub fn fn_sum(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Number(args.iter().map(FormulaValue::to_number).sum()))
}

/// ABS(number)
pub fn fn_abs(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Number(arg(args, 0).to_number().abs()))
}

/// FLOOR(number): largest integer not above the number
pub fn fn_floor(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Number(arg(args, 0).to_number().floor()))
}

/// CEIL(number): smallest integer not below the number
pub fn fn_ceil(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Number(arg(args, 0).to_number().ceil()))
}

/// ROUND(number, [digits])
pub fn fn_round(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let number = arg(args, 0).to_number();
    let num_digits = arg(args, 1).to_number().trunc() as i32;

    // Round half away from zero; negative digits round left of the decimal point
    let multiplier = 10_f64.powi(num_digits);
    let result = if number >= 0.0 {
        (number * multiplier + 0.5).floor() / multiplier
    } else {
        (number * multiplier - 0.5).ceil() / multiplier
    };

    Ok(FormulaValue::Number(result))
}
