use derive_more::Display;

use telemetry::IsErr;

use crate::ast::BinaryOperator;

/// Syntax recognised by a general purpose expression language but outside the
/// arithmetic whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Construct {
    Name,
    Keyword,
    BooleanOperator,
    Comparison,
    StringLiteral,
    AttributeAccess,
    Subscript,
    Call,
    Collection,
    Assignment,
    BitwiseOperator,
    UnaryPlus,
    MatrixMultiply,
    MultipleStatements,
    SliceOrAnnotation,
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum ExprError {
    #[display(fmt = "Syntax Error at offset {}: {}", position, message)]
    Syntax { position: usize, message: String },

    #[display(
        fmt = "Unsupported Construct at offset {}: {} \"{}\"",
        position,
        construct,
        fragment
    )]
    UnsupportedConstruct {
        construct: Construct,
        position: usize,
        fragment: String,
    },

    #[display(fmt = "Unbound Variable: {}", _0)]
    UnboundVariable(String),

    #[display(fmt = "Division By Zero: right operand of \"{}\" is zero", _0)]
    DivisionByZero(BinaryOperator),

    #[display(fmt = "Expression Too Complex: nesting exceeds {}", limit)]
    TooComplex { limit: usize },
}

impl std::error::Error for ExprError {}

impl IsErr for ExprError {
    fn is_err(&self) -> bool {
        matches!(self, ExprError::UnboundVariable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = ExprError::UnsupportedConstruct {
            construct: Construct::AttributeAccess,
            position: 1,
            fragment: ".__class__".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Unsupported Construct at offset 1: attribute_access \".__class__\""
        );

        let e = ExprError::DivisionByZero(BinaryOperator::FloorDiv);
        assert_eq!(
            e.to_string(),
            "Division By Zero: right operand of \"//\" is zero"
        );

        let e = ExprError::TooComplex { limit: 256 };
        assert_eq!(e.to_string(), "Expression Too Complex: nesting exceeds 256");
    }

    #[test]
    fn test_construct_display() {
        assert_eq!(Construct::AttributeAccess.to_string(), "attribute_access");
        assert_eq!(Construct::Name.to_string(), "name");
        assert_eq!(
            Construct::MultipleStatements.to_string(),
            "multiple_statements"
        );
    }

    #[test]
    fn test_is_err() {
        assert!(ExprError::UnboundVariable("c".to_string()).is_err());
        assert!(!ExprError::DivisionByZero(BinaryOperator::Div).is_err());
        assert!(!ExprError::TooComplex { limit: 1 }.is_err());
        assert!(!ExprError::Syntax {
            position: 0,
            message: "Unexpected end of input".to_string()
        }
        .is_err());
    }
}
