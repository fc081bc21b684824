//! # tabula-formula
//!
//! Formula language for computed fields.
//!
//! This crate provides:
//! - Tokenizing (text → tokens)
//! - Parsing with operator precedence (tokens → AST, or straight to a value)
//! - Single-pass evaluation against a row
//! - Built-in functions (IF, AND, OR, NOT, CONCAT, UPPER, LOWER, LEN, TRIM,
//!   SUM, ABS, ROUND, FLOOR, CEIL, NOW, TODAY, DAYS)
//! - Dependency tracking between formula fields
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{CellValue, Field, Row};
//! use tabula_formula::evaluate_formula;
//!
//! let fields = vec![Field::text("name", "Name")];
//! let row = Row::new("r1").with_cell("name", "hello");
//!
//! assert_eq!(
//!     evaluate_formula("LEN(UPPER({Name}))", &row, &fields),
//!     CellValue::Number(5.0)
//! );
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod tokenizer;

pub use ast::{BinaryOperator, FormulaExpr};
pub use dependency::{is_volatile, referenced_fields, DependencyGraph, FormulaDependencies};
pub use error::{ErrorKind, FormulaError, FormulaResult, ERROR_PREFIX};
pub use evaluator::{
    evaluate_formula, evaluate_formula_with, is_error_value, try_evaluate_formula,
    EvaluationContext, FormulaValue,
};
pub use parser::parse_formula;
pub use tokenizer::{tokenize, Token};
