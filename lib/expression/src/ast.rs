use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BinaryOperator {
    #[display(fmt = "+")]
    Add,
    #[display(fmt = "-")]
    Sub,
    #[display(fmt = "*")]
    Mul,
    #[display(fmt = "/")]
    Div,
    #[display(fmt = "//")]
    FloorDiv,
    #[display(fmt = "%")]
    Mod,
    #[display(fmt = "^")]
    Pow,
}

impl BinaryOperator {
    /// Binding strength, higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => 2,
            Self::Pow => 3,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnaryOperator {
    #[display(fmt = "-")]
    Neg,
}

/// A parsed arithmetic expression
///
/// Trees produced by [`crate::parse`] only ever reference the variables `a` and `b`,
/// but a tree may also be assembled by hand, in which case the evaluator rejects
/// any other name.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    Variable(String),
    Binary(BinaryOperator, Box<Expr>, Box<Expr>),
    Unary(UnaryOperator, Box<Expr>),
}

impl Expr {
    pub fn variable(name: &str) -> Expr {
        Expr::Variable(name.to_string())
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn negate(operand: Expr) -> Expr {
        Expr::Unary(UnaryOperator::Neg, Box::new(operand))
    }
}
