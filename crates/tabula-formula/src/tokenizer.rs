//! Formula tokenizer
//!
//! Turns expression text into a flat token stream. Whitespace is skipped.
//! Identifiers that are neither a known function nor `TRUE`/`FALSE` become
//! string literals, so `Done` and `"Done"` tokenize the same way.

use crate::error::{FormulaError, FormulaResult};
use crate::functions::function_registry;
use std::fmt;

/// A lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Integer or decimal literal
    Number(f64),
    /// Quoted literal or bare identifier
    String(String),
    /// `TRUE` / `FALSE`, any case
    Boolean(bool),
    /// `{Field Name}`: the raw text between the braces
    FieldRef(String),
    /// Arithmetic or comparison operator
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
    /// Name of a built-in function, uppercased
    Function(String),
}

/// Operators, in the order two-character forms must be tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
}

impl Operator {
    /// Source text of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => f.write_str(&tabula_core::format_number(*n)),
            Token::String(s) => f.write_str(s),
            Token::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Token::FieldRef(name) => write!(f, "{{{}}}", name),
            Token::Operator(op) => f.write_str(op.as_str()),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Function(name) => f.write_str(name),
        }
    }
}

const TWO_CHAR_OPERATORS: [(&str, Operator); 4] = [
    (">=", Operator::GreaterEqual),
    ("<=", Operator::LessEqual),
    ("==", Operator::Equal),
    ("!=", Operator::NotEqual),
];

/// Tokenize a formula expression
///
/// # Example
/// ```rust
/// use tabula_formula::tokenizer::{tokenize, Token};
///
/// let tokens = tokenize("{Price} * 2").unwrap();
/// assert_eq!(tokens[0], Token::FieldRef("Price".into()));
/// assert_eq!(tokens.len(), 3);
/// ```
pub fn tokenize(expression: &str) -> FormulaResult<Vec<Token>> {
    Tokenizer::new(expression).run()
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> FormulaResult<Vec<Token>> {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
                continue;
            }

            let token = self.scan_token(c)?;
            self.tokens.push(token);
        }
        Ok(self.tokens)
    }

    fn scan_token(&mut self, c: char) -> FormulaResult<Token> {
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return Ok(self.scan_number());
        }

        if c == '"' || c == '\'' {
            return self.scan_string(c);
        }

        if c == '{' {
            return self.scan_field_ref();
        }

        if c.is_alphabetic() || c == '_' {
            return Ok(self.scan_identifier());
        }

        let rest = &self.input[self.pos..];
        for (text, op) in TWO_CHAR_OPERATORS {
            if rest.starts_with(text) {
                self.pos += text.len();
                return Ok(Token::Operator(op));
            }
        }

        let token = match c {
            '+' => Token::Operator(Operator::Plus),
            '-' => Token::Operator(Operator::Minus),
            '*' => Token::Operator(Operator::Star),
            '/' => Token::Operator(Operator::Slash),
            '%' => Token::Operator(Operator::Percent),
            '>' => Token::Operator(Operator::Greater),
            '<' => Token::Operator(Operator::Less),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            _ => {
                return Err(FormulaError::UnexpectedCharacter {
                    ch: c,
                    position: self.pos,
                })
            }
        };
        self.advance();
        Ok(token)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;

        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // `1.` is a number; a bare `.` needs a digit after it
        let has_integer = self.pos > start;
        if self.peek_char() == Some('.')
            && (has_integer || self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = self.input[start..self.pos].trim_end_matches('.');
        Token::Number(num_str.parse().unwrap_or(0.0))
    }

    fn scan_string(&mut self, quote: char) -> FormulaResult<Token> {
        self.advance(); // opening quote
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c == quote {
                let s = self.input[start..self.pos].to_string();
                self.advance();
                return Ok(Token::String(s));
            }
            self.advance();
        }

        Err(FormulaError::UnterminatedString)
    }

    fn scan_field_ref(&mut self) -> FormulaResult<Token> {
        self.advance(); // '{'
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c == '}' {
                let name = self.input[start..self.pos].to_string();
                self.advance();
                return Ok(Token::FieldRef(name));
            }
            self.advance();
        }

        Err(FormulaError::UnterminatedFieldRef)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        let upper = text.to_uppercase();

        match upper.as_str() {
            "TRUE" => Token::Boolean(true),
            "FALSE" => Token::Boolean(false),
            _ if function_registry().contains(&upper) => Token::Function(upper),
            _ => Token::String(text.to_string()),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbers() {
        assert_eq!(tokenize("42").unwrap(), vec![Token::Number(42.0)]);
        assert_eq!(tokenize("3.25").unwrap(), vec![Token::Number(3.25)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("1.").unwrap(), vec![Token::Number(1.0)]);
        assert_eq!(
            tokenize("2. + 1").unwrap(),
            vec![
                Token::Number(2.0),
                Token::Operator(Operator::Plus),
                Token::Number(1.0)
            ]
        );
    }

    #[test]
    fn test_negative_number_is_operator_then_number() {
        assert_eq!(
            tokenize("-3").unwrap(),
            vec![Token::Operator(Operator::Minus), Token::Number(3.0)]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokenize("'hello world'").unwrap(),
            vec![Token::String("hello world".into())]
        );
        assert_eq!(tokenize("\"x\"").unwrap(), vec![Token::String("x".into())]);
        assert_eq!(
            tokenize("'it\"s'").unwrap(),
            vec![Token::String("it\"s".into())]
        );
    }

    #[test]
    fn test_bare_identifier_is_string() {
        assert_eq!(tokenize("Done").unwrap(), vec![Token::String("Done".into())]);
        assert_eq!(
            tokenize("SUMM").unwrap(),
            vec![Token::String("SUMM".into())]
        );
    }

    #[test]
    fn test_booleans_any_case() {
        assert_eq!(
            tokenize("TRUE false True").unwrap(),
            vec![
                Token::Boolean(true),
                Token::Boolean(false),
                Token::Boolean(true)
            ]
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            tokenize("if(").unwrap(),
            vec![Token::Function("IF".into()), Token::LeftParen]
        );
        assert_eq!(
            tokenize("DAYS").unwrap(),
            vec![Token::Function("DAYS".into())]
        );
    }

    #[test]
    fn test_field_ref_keeps_raw_text() {
        assert_eq!(
            tokenize("{ Due Date }").unwrap(),
            vec![Token::FieldRef(" Due Date ".into())]
        );
    }

    #[test]
    fn test_two_char_operators_first() {
        assert_eq!(
            tokenize("1 >= 2 <= 3 == 4 != 5 > 6 < 7").unwrap(),
            vec![
                Token::Number(1.0),
                Token::Operator(Operator::GreaterEqual),
                Token::Number(2.0),
                Token::Operator(Operator::LessEqual),
                Token::Number(3.0),
                Token::Operator(Operator::Equal),
                Token::Number(4.0),
                Token::Operator(Operator::NotEqual),
                Token::Number(5.0),
                Token::Operator(Operator::Greater),
                Token::Number(6.0),
                Token::Operator(Operator::Less),
                Token::Number(7.0),
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            tokenize("SUM(1, 2)").unwrap(),
            vec![
                Token::Function("SUM".into()),
                Token::LeftParen,
                Token::Number(1.0),
                Token::Comma,
                Token::Number(2.0),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            tokenize("'open").unwrap_err(),
            FormulaError::UnterminatedString
        );
        assert_eq!(
            tokenize("{Name").unwrap_err(),
            FormulaError::UnterminatedFieldRef
        );
        assert_eq!(
            tokenize("1 = 2").unwrap_err(),
            FormulaError::UnexpectedCharacter { ch: '=', position: 2 }
        );
        assert!(matches!(
            tokenize("a & b"),
            Err(FormulaError::UnexpectedCharacter { ch: '&', .. })
        ));
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize("   \t\n").unwrap().is_empty());
    }
}
