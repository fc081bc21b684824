//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Prefix of the cell value an evaluation failure is rendered as
pub const ERROR_PREFIX: &str = "#ERROR: ";

/// Errors that can occur during formula parsing or evaluation
///
/// The `Display` output is the message shown to users after [`ERROR_PREFIX`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    // === Parse errors ===
    /// String literal without a closing quote
    #[error("Unterminated string literal")]
    UnterminatedString,

    /// `{` without a matching `}`
    #[error("Unterminated field reference")]
    UnterminatedFieldRef,

    /// Character that starts no token
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    /// Token that does not fit the grammar at this point
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    /// Input ended where more was required
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// A specific token was required
    #[error("Expected {expected} but found {found}")]
    ExpectedToken { expected: String, found: String },

    /// Parentheses, unary minus or calls nested past the parser's limit
    #[error("Expression too deeply nested")]
    TooDeeplyNested,

    // === Evaluation errors ===
    /// Field reference names no field of the table
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Function name with no implementation
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Text that is not a recognizable date
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// The two classes of formula failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The expression is malformed
    Parse,
    /// The expression is well formed but could not be evaluated
    Evaluation,
}

impl FormulaError {
    /// Which class of failure this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormulaError::UnterminatedString
            | FormulaError::UnterminatedFieldRef
            | FormulaError::UnexpectedCharacter { .. }
            | FormulaError::UnexpectedToken(_)
            | FormulaError::UnexpectedEnd
            | FormulaError::ExpectedToken { .. }
            | FormulaError::TooDeeplyNested => ErrorKind::Parse,
            FormulaError::UnknownField(_)
            | FormulaError::UnknownFunction(_)
            | FormulaError::ArgumentCount { .. }
            | FormulaError::DivisionByZero
            | FormulaError::InvalidDate(_) => ErrorKind::Evaluation,
        }
    }

    /// The value stored in a cell when evaluation fails
    pub fn to_display_value(&self) -> String {
        format!("{}{}", ERROR_PREFIX, self)
    }
}
