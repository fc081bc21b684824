//! Formula parser
//!
//! A recursive descent parser over the token stream. The parser does not
//! decide what a node means: every production is handed to an
//! [`ExprBuilder`], which either records it ([`AstBuilder`]) or computes it on
//! the spot (the evaluator). Building and evaluating therefore share one
//! grammar, and an evaluating builder fails at exactly the point a
//! single-pass interpreter would.
//!
//! Precedence (lowest to highest):
//! 1. Comparison: `> < >= <= == !=`
//! 2. Additive: `+ -`
//! 3. Multiplicative: `* / %`
//! 4. Primary: literals, field references, function calls, parentheses, unary minus

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::error::{FormulaError, FormulaResult};
use crate::tokenizer::{tokenize, Operator, Token};

/// Deepest nesting of parentheses, unary minus and call arguments accepted
pub const MAX_NESTING_DEPTH: usize = 256;

/// Receives each grammar production as it is recognized
pub trait ExprBuilder {
    type Output;

    fn number(&mut self, n: f64) -> FormulaResult<Self::Output>;
    fn string(&mut self, s: String) -> FormulaResult<Self::Output>;
    fn boolean(&mut self, b: bool) -> FormulaResult<Self::Output>;
    fn field_ref(&mut self, name: String) -> FormulaResult<Self::Output>;
    fn negate(&mut self, operand: Self::Output) -> FormulaResult<Self::Output>;
    fn binary(
        &mut self,
        op: BinaryOperator,
        left: Self::Output,
        right: Self::Output,
    ) -> FormulaResult<Self::Output>;
    fn call(&mut self, name: String, args: Vec<Self::Output>) -> FormulaResult<Self::Output>;
}

/// Builder producing a [`FormulaExpr`]; never fails on its own
#[derive(Debug, Default)]
pub struct AstBuilder;

impl ExprBuilder for AstBuilder {
    type Output = FormulaExpr;

    fn number(&mut self, n: f64) -> FormulaResult<FormulaExpr> {
        Ok(FormulaExpr::Number(n))
    }

    fn string(&mut self, s: String) -> FormulaResult<FormulaExpr> {
        Ok(FormulaExpr::String(s))
    }

    fn boolean(&mut self, b: bool) -> FormulaResult<FormulaExpr> {
        Ok(FormulaExpr::Boolean(b))
    }

    fn field_ref(&mut self, name: String) -> FormulaResult<FormulaExpr> {
        Ok(FormulaExpr::FieldRef(name))
    }

    fn negate(&mut self, operand: FormulaExpr) -> FormulaResult<FormulaExpr> {
        Ok(FormulaExpr::Negate(Box::new(operand)))
    }

    fn binary(
        &mut self,
        op: BinaryOperator,
        left: FormulaExpr,
        right: FormulaExpr,
    ) -> FormulaResult<FormulaExpr> {
        Ok(FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn call(&mut self, name: String, args: Vec<FormulaExpr>) -> FormulaResult<FormulaExpr> {
        Ok(FormulaExpr::Function { name, args })
    }
}

/// Parse a formula expression into an AST
///
/// # Example
/// ```rust
/// use tabula_formula::{parse_formula, FormulaExpr};
///
/// let ast = parse_formula("{Price} * 2").unwrap();
/// assert!(matches!(ast, FormulaExpr::BinaryOp { .. }));
/// ```
pub fn parse_formula(expression: &str) -> FormulaResult<FormulaExpr> {
    run(expression, &mut AstBuilder)
}

/// Tokenize `expression` and drive `builder` over the whole token stream
///
/// Trailing tokens after a complete expression are an error.
pub fn run<B: ExprBuilder>(expression: &str, builder: &mut B) -> FormulaResult<B::Output> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser::new(&tokens, builder);
    let output = parser.parse_expression()?;

    if let Some(token) = parser.current() {
        return Err(FormulaError::UnexpectedToken(token.to_string()));
    }

    Ok(output)
}

/// Recursive descent parser over a token slice
pub struct Parser<'t, 'b, B: ExprBuilder> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    builder: &'b mut B,
}

impl<'t, 'b, B: ExprBuilder> Parser<'t, 'b, B> {
    pub fn new(tokens: &'t [Token], builder: &'b mut B) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            builder,
        }
    }

    // === Token helpers ===

    fn current(&self) -> Option<&'t Token> {
        let tokens = self.tokens;
        tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.current();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_operator(&self) -> Option<Operator> {
        match self.current() {
            Some(Token::Operator(op)) => Some(*op),
            _ => None,
        }
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        match self.current() {
            Some(token) if token == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(FormulaError::ExpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
            }),
            None => Err(FormulaError::ExpectedToken {
                expected: expected.to_string(),
                found: "end of expression".into(),
            }),
        }
    }

    /// Run `parse` one nesting level deeper
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> FormulaResult<T>,
    ) -> FormulaResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(FormulaError::TooDeeplyNested);
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // === Expression parsing with precedence ===

    pub fn parse_expression(&mut self) -> FormulaResult<B::Output> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> FormulaResult<B::Output> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.current_operator() {
                Some(Operator::Greater) => BinaryOperator::GreaterThan,
                Some(Operator::Less) => BinaryOperator::LessThan,
                Some(Operator::GreaterEqual) => BinaryOperator::GreaterEqual,
                Some(Operator::LessEqual) => BinaryOperator::LessEqual,
                Some(Operator::Equal) => BinaryOperator::Equal,
                Some(Operator::NotEqual) => BinaryOperator::NotEqual,
                _ => break,
            };

            self.pos += 1;
            let right = self.parse_additive()?;
            left = self.builder.binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> FormulaResult<B::Output> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_operator() {
                Some(Operator::Plus) => BinaryOperator::Add,
                Some(Operator::Minus) => BinaryOperator::Subtract,
                _ => break,
            };

            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = self.builder.binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<B::Output> {
        let mut left = self.parse_primary()?;

        loop {
            let op = match self.current_operator() {
                Some(Operator::Star) => BinaryOperator::Multiply,
                Some(Operator::Slash) => BinaryOperator::Divide,
                Some(Operator::Percent) => BinaryOperator::Modulo,
                _ => break,
            };

            self.pos += 1;
            let right = self.parse_primary()?;
            left = self.builder.binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> FormulaResult<B::Output> {
        let token = self.advance().ok_or(FormulaError::UnexpectedEnd)?;

        match token {
            Token::Number(n) => self.builder.number(*n),
            Token::String(s) => self.builder.string(s.clone()),
            Token::Boolean(b) => self.builder.boolean(*b),
            Token::FieldRef(name) => self.builder.field_ref(name.clone()),
            Token::Function(name) => self.nested(|p| p.parse_function_call(name.clone())),
            Token::LeftParen => self.nested(|p| {
                let inner = p.parse_expression()?;
                p.expect(&Token::RightParen)?;
                Ok(inner)
            }),
            Token::Operator(Operator::Minus) => self.nested(|p| {
                let operand = p.parse_primary()?;
                p.builder.negate(operand)
            }),
            other => Err(FormulaError::UnexpectedToken(other.to_string())),
        }
    }

    fn parse_function_call(&mut self, name: String) -> FormulaResult<B::Output> {
        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();

        if !matches!(self.current(), Some(Token::RightParen)) {
            args.push(self.parse_expression()?);

            while matches!(self.current(), Some(Token::Comma)) {
                self.pos += 1;
                args.push(self.parse_expression()?);
            }
        }

        self.expect(&Token::RightParen)?;
        self.builder.call(name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Box<FormulaExpr> {
        Box::new(FormulaExpr::Number(n))
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse_formula("42").unwrap(), FormulaExpr::Number(42.0));
        assert_eq!(
            parse_formula("'hi'").unwrap(),
            FormulaExpr::String("hi".into())
        );
        assert_eq!(parse_formula("true").unwrap(), FormulaExpr::Boolean(true));
        assert_eq!(
            parse_formula("{Name}").unwrap(),
            FormulaExpr::FieldRef("Name".into())
        );
    }

    #[test]
    fn test_parse_precedence() {
        // 2 + (3 * 2)
        assert_eq!(
            parse_formula("2 + 3 * 2").unwrap(),
            FormulaExpr::BinaryOp {
                op: BinaryOperator::Add,
                left: num(2.0),
                right: Box::new(FormulaExpr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    left: num(3.0),
                    right: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_parse_left_associative() {
        // (10 - 4) - 3
        assert_eq!(
            parse_formula("10 - 4 - 3").unwrap(),
            FormulaExpr::BinaryOp {
                op: BinaryOperator::Subtract,
                left: Box::new(FormulaExpr::BinaryOp {
                    op: BinaryOperator::Subtract,
                    left: num(10.0),
                    right: num(4.0),
                }),
                right: num(3.0),
            }
        );
    }

    #[test]
    fn test_parse_comparison_binds_loosest() {
        let ast = parse_formula("1 + 1 == 2").unwrap();
        assert!(matches!(
            ast,
            FormulaExpr::BinaryOp {
                op: BinaryOperator::Equal,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_unary_minus_binds_tightest() {
        // (-2) * 3
        assert_eq!(
            parse_formula("-2 * 3").unwrap(),
            FormulaExpr::BinaryOp {
                op: BinaryOperator::Multiply,
                left: Box::new(FormulaExpr::Negate(num(2.0))),
                right: num(3.0),
            }
        );
    }

    #[test]
    fn test_parse_function() {
        let ast = parse_formula("ROUND({Price} / 3, 2)").unwrap();
        if let FormulaExpr::Function { name, args } = ast {
            assert_eq!(name, "ROUND");
            assert_eq!(args.len(), 2);
        } else {
            panic!("Expected Function");
        }

        assert_eq!(
            parse_formula("NOW()").unwrap(),
            FormulaExpr::Function {
                name: "NOW".into(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = parse_formula("(1 + 2) * 3").unwrap();
        assert!(matches!(
            ast,
            FormulaExpr::BinaryOp {
                op: BinaryOperator::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert_eq!(
            parse_formula("1 2").unwrap_err(),
            FormulaError::UnexpectedToken("2".into())
        );
        // A misspelled function is a bare string followed by a stray paren
        assert_eq!(
            parse_formula("SUMM(1, 2)").unwrap_err(),
            FormulaError::UnexpectedToken("(".into())
        );
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!(
            "{}1{}",
            "(".repeat(MAX_NESTING_DEPTH),
            ")".repeat(MAX_NESTING_DEPTH)
        );
        assert_eq!(parse_formula(&at_limit).unwrap(), FormulaExpr::Number(1.0));

        for depth in [MAX_NESTING_DEPTH + 1, 1_000, 100_000] {
            let parens = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
            assert_eq!(
                parse_formula(&parens).unwrap_err(),
                FormulaError::TooDeeplyNested
            );

            let minus = format!("{}1", "-".repeat(depth));
            assert_eq!(
                parse_formula(&minus).unwrap_err(),
                FormulaError::TooDeeplyNested
            );

            let calls = format!("{}1{}", "ABS(".repeat(depth), ")".repeat(depth));
            assert_eq!(
                parse_formula(&calls).unwrap_err(),
                FormulaError::TooDeeplyNested
            );
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_formula("1 +").unwrap_err(), FormulaError::UnexpectedEnd);
        assert_eq!(
            parse_formula("(1 + 2").unwrap_err(),
            FormulaError::ExpectedToken {
                expected: ")".into(),
                found: "end of expression".into()
            }
        );
        assert_eq!(
            parse_formula("UPPER 'x'").unwrap_err(),
            FormulaError::ExpectedToken {
                expected: "(".into(),
                found: "x".into()
            }
        );
        assert_eq!(
            parse_formula("* 2").unwrap_err(),
            FormulaError::UnexpectedToken("*".into())
        );
        assert_eq!(
            parse_formula("SUM(1,)").unwrap_err(),
            FormulaError::UnexpectedToken(")".into())
        );
    }
}
