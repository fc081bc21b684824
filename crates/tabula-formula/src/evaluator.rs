//! Formula evaluator
//!
//! Evaluates an expression against one row in a single pass: the parser drives
//! an [`Evaluator`] builder, so every sub-expression is computed as soon as it
//! is recognized.
//!
//! Results are deterministic for a given row, field list and expression,
//! except for `NOW()` and `TODAY()`, which read the context's clock. A
//! context built with [`EvaluationContext::new`] reads the wall clock; use
//! [`EvaluationContext::with_now`] to pin it.

use crate::ast::BinaryOperator;
use crate::error::{FormulaError, FormulaResult, ERROR_PREFIX};
use crate::functions::function_registry;
use crate::parser::{run, ExprBuilder};
use chrono::{DateTime, Utc};
use std::fmt;
use tabula_core::{format_number, parse_number, CellValue, Field, Row};

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormulaValue {
    #[default]
    Null,
    Number(f64),
    String(String),
    Boolean(bool),
}

impl FormulaValue {
    /// Numeric coercion: null is 0, booleans are 0/1, strings are parsed or 0
    pub fn to_number(&self) -> f64 {
        match self {
            FormulaValue::Null => 0.0,
            FormulaValue::Number(n) => *n,
            FormulaValue::String(s) => parse_number(s),
            FormulaValue::Boolean(true) => 1.0,
            FormulaValue::Boolean(false) => 0.0,
        }
    }

    /// Boolean coercion: null is false, numbers are nonzero, strings are nonempty
    pub fn to_bool(&self) -> bool {
        match self {
            FormulaValue::Null => false,
            FormulaValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FormulaValue::String(s) => !s.is_empty(),
            FormulaValue::Boolean(b) => *b,
        }
    }

    /// String coercion: null is empty, booleans are `true`/`false`
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Check if this is a string
    pub fn is_string(&self) -> bool {
        matches!(self, FormulaValue::String(_))
    }
}

impl fmt::Display for FormulaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaValue::Null => Ok(()),
            FormulaValue::Number(n) => f.write_str(&format_number(*n)),
            FormulaValue::String(s) => f.write_str(s),
            FormulaValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Reading a cell into a formula: lists are joined, everything else passes through
impl From<&CellValue> for FormulaValue {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Null => FormulaValue::Null,
            CellValue::Boolean(b) => FormulaValue::Boolean(*b),
            CellValue::Number(n) => FormulaValue::Number(*n),
            CellValue::Text(s) => FormulaValue::String(s.clone()),
            CellValue::List(_) => FormulaValue::String(value.to_string()),
        }
    }
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            FormulaValue::Null => CellValue::Null,
            FormulaValue::Number(n) => CellValue::Number(n),
            FormulaValue::String(s) => CellValue::Text(s),
            FormulaValue::Boolean(b) => CellValue::Boolean(b),
        }
    }
}

/// Context for formula evaluation
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    /// Row whose cells field references read
    pub row: &'a Row,
    /// Fields of the row's table; references match on exact name
    pub fields: &'a [Field],
    /// Instant returned by `NOW()` and used by `TODAY()`
    pub now: DateTime<Utc>,
}

impl<'a> EvaluationContext<'a> {
    /// Create a context whose clock is the current wall-clock time
    pub fn new(row: &'a Row, fields: &'a [Field]) -> Self {
        Self::with_now(row, fields, Utc::now())
    }

    /// Create a context with a fixed clock
    pub fn with_now(row: &'a Row, fields: &'a [Field], now: DateTime<Utc>) -> Self {
        Self { row, fields, now }
    }

    /// Resolve `{name}` to the row's value for that field
    pub fn field_value(&self, name: &str) -> FormulaResult<FormulaValue> {
        let field = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| FormulaError::UnknownField(name.to_string()))?;
        Ok(self.row.get(&field.id).into())
    }
}

/// Builder that computes each production as it is parsed
pub struct Evaluator<'c, 'a> {
    ctx: &'c EvaluationContext<'a>,
}

impl<'c, 'a> Evaluator<'c, 'a> {
    pub fn new(ctx: &'c EvaluationContext<'a>) -> Self {
        Self { ctx }
    }
}

impl ExprBuilder for Evaluator<'_, '_> {
    type Output = FormulaValue;

    fn number(&mut self, n: f64) -> FormulaResult<FormulaValue> {
        Ok(FormulaValue::Number(n))
    }

    fn string(&mut self, s: String) -> FormulaResult<FormulaValue> {
        Ok(FormulaValue::String(s))
    }

    fn boolean(&mut self, b: bool) -> FormulaResult<FormulaValue> {
        Ok(FormulaValue::Boolean(b))
    }

    fn field_ref(&mut self, name: String) -> FormulaResult<FormulaValue> {
        self.ctx.field_value(&name)
    }

    fn negate(&mut self, operand: FormulaValue) -> FormulaResult<FormulaValue> {
        Ok(FormulaValue::Number(-operand.to_number()))
    }

    fn binary(
        &mut self,
        op: BinaryOperator,
        left: FormulaValue,
        right: FormulaValue,
    ) -> FormulaResult<FormulaValue> {
        evaluate_binary_op(op, &left, &right)
    }

    fn call(&mut self, name: String, args: Vec<FormulaValue>) -> FormulaResult<FormulaValue> {
        evaluate_function(&name, &args, self.ctx)
    }
}

/// Evaluate a binary operation on already-computed operands
pub fn evaluate_binary_op(
    op: BinaryOperator,
    left: &FormulaValue,
    right: &FormulaValue,
) -> FormulaResult<FormulaValue> {
    let value = match op {
        // `+` concatenates as soon as either side is a string
        BinaryOperator::Add => {
            if left.is_string() || right.is_string() {
                FormulaValue::String(left.as_string() + &right.as_string())
            } else {
                FormulaValue::Number(left.to_number() + right.to_number())
            }
        }
        BinaryOperator::Subtract => FormulaValue::Number(left.to_number() - right.to_number()),
        BinaryOperator::Multiply => FormulaValue::Number(left.to_number() * right.to_number()),
        BinaryOperator::Divide => {
            let divisor = right.to_number();
            if divisor == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            FormulaValue::Number(left.to_number() / divisor)
        }
        BinaryOperator::Modulo => {
            let divisor = right.to_number();
            if divisor == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            FormulaValue::Number(left.to_number() % divisor)
        }

        // Equality compares text, ordering compares numbers
        BinaryOperator::Equal => FormulaValue::Boolean(left.as_string() == right.as_string()),
        BinaryOperator::NotEqual => FormulaValue::Boolean(left.as_string() != right.as_string()),
        BinaryOperator::GreaterThan => FormulaValue::Boolean(left.to_number() > right.to_number()),
        BinaryOperator::LessThan => FormulaValue::Boolean(left.to_number() < right.to_number()),
        BinaryOperator::GreaterEqual => {
            FormulaValue::Boolean(left.to_number() >= right.to_number())
        }
        BinaryOperator::LessEqual => FormulaValue::Boolean(left.to_number() <= right.to_number()),
    };

    Ok(value)
}

/// Evaluate a function call on already-computed arguments
pub fn evaluate_function(
    name: &str,
    args: &[FormulaValue],
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let func = function_registry()
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    if args.len() < func.min_args || func.max_args.map_or(false, |max| args.len() > max) {
        return Err(FormulaError::ArgumentCount {
            function: func.name.to_string(),
            expected: func.arity(),
            actual: args.len(),
        });
    }

    (func.implementation)(args, ctx)
}

/// Evaluate an expression, keeping the typed result
///
/// A blank expression evaluates to [`FormulaValue::Null`].
pub fn try_evaluate_formula(
    expression: &str,
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    if expression.trim().is_empty() {
        return Ok(FormulaValue::Null);
    }
    run(expression, &mut Evaluator::new(ctx))
}

/// Evaluate an expression for a row, reading the wall clock for `NOW()`/`TODAY()`
///
/// Never fails: any parse or evaluation error becomes a text value starting
/// with `#ERROR: ` followed by the message.
///
/// # Example
/// ```rust
/// use tabula_core::{CellValue, Field, Row};
/// use tabula_formula::evaluate_formula;
///
/// let fields = vec![Field::number("a", "A"), Field::number("b", "B")];
/// let row = Row::new("r1").with_cell("a", 10.0).with_cell("b", 4.0);
///
/// assert_eq!(evaluate_formula("{A} + {B} * 2", &row, &fields), CellValue::Number(18.0));
/// assert_eq!(
///     evaluate_formula("{A} / 0", &row, &fields),
///     CellValue::text("#ERROR: Division by zero")
/// );
/// ```
pub fn evaluate_formula(expression: &str, row: &Row, fields: &[Field]) -> CellValue {
    evaluate_formula_with(expression, &EvaluationContext::new(row, fields))
}

/// Like [`evaluate_formula`] with an explicit context
pub fn evaluate_formula_with(expression: &str, ctx: &EvaluationContext) -> CellValue {
    match try_evaluate_formula(expression, ctx) {
        Ok(value) => value.into(),
        Err(e) => CellValue::Text(e.to_display_value()),
    }
}

/// Whether a cell value is an evaluation error
pub fn is_error_value(value: &CellValue) -> bool {
    value.as_text().map_or(false, |s| s.starts_with(ERROR_PREFIX))
}
