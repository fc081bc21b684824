//! Formula abstract syntax tree

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// String literal (quoted or bare identifier)
    String(String),
    /// Boolean literal
    Boolean(bool),

    // === References ===
    /// `{Field Name}`
    FieldRef(String),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary minus
    Negate(Box<FormulaExpr>),

    // === Function call ===
    Function {
        name: String,
        args: Vec<FormulaExpr>,
    },
}

impl FormulaExpr {
    /// Visit this node and every descendant, parents first
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a FormulaExpr)) {
        visit(self);
        match self {
            FormulaExpr::BinaryOp { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            FormulaExpr::Negate(operand) => operand.walk(visit),
            FormulaExpr::Function { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            _ => {}
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}
