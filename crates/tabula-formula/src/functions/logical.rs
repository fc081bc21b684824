//! Logical functions

use super::arg;
use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};

/// IF(condition, then, [else])
pub fn fn_if(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let branch = if arg(args, 0).to_bool() { 1 } else { 2 };
    Ok(arg(args, branch).clone())
}

/// AND(value, ...): true when every argument is truthy
pub fn fn_and(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Boolean(args.iter().all(FormulaValue::to_bool)))
}

/// OR(value, ...): true when any argument is truthy
pub fn fn_or(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Boolean(args.iter().any(FormulaValue::to_bool)))
}

/// NOT(value)
pub fn fn_not(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Boolean(!arg(args, 0).to_bool()))
}
