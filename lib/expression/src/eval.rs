use log::debug;

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::ExprError;

/// Values for the two variables an expression may reference
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bindings {
    pub a: f64,
    pub b: f64,
}

impl Bindings {
    pub fn new(a: f64, b: f64) -> Bindings {
        Bindings { a, b }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "a" => Some(self.a),
            "b" => Some(self.b),
            _ => None,
        }
    }
}

/// Floored quotient and remainder, the remainder taking the sign of the divisor
///
/// The quotient is derived from the corrected remainder rather than from
/// `(x / y).floor()` so that `x == y * q + r` holds as closely as floats allow.
fn floor_div_mod(x: f64, y: f64) -> (f64, f64) {
    let mut rem = x % y;
    let mut div = (x - rem) / y;

    if rem != 0.0 {
        if (y < 0.0) != (rem < 0.0) {
            rem += y;
            div -= 1.0;
        }
    } else {
        rem = 0.0_f64.copysign(y);
    }

    let quotient = if div != 0.0 {
        let floor = div.floor();
        if div - floor > 0.5 {
            floor + 1.0
        } else {
            floor
        }
    } else {
        0.0_f64.copysign(x / y)
    };

    (quotient, rem)
}

pub fn apply(op: BinaryOperator, left: f64, right: f64) -> Result<f64, ExprError> {
    match op {
        BinaryOperator::Add => Ok(left + right),
        BinaryOperator::Sub => Ok(left - right),
        BinaryOperator::Mul => Ok(left * right),
        BinaryOperator::Div | BinaryOperator::FloorDiv | BinaryOperator::Mod if right == 0.0 => {
            Err(ExprError::DivisionByZero(op))
        }
        BinaryOperator::Div => Ok(left / right),
        BinaryOperator::FloorDiv => Ok(floor_div_mod(left, right).0),
        BinaryOperator::Mod => Ok(floor_div_mod(left, right).1),
        // Non-real results come back as NaN
        BinaryOperator::Pow => Ok(left.powf(right)),
    }
}

pub fn evaluate(expr: &Expr, bindings: &Bindings) -> Result<f64, ExprError> {
    match expr {
        Expr::Literal(v) => Ok(*v),
        Expr::Variable(name) => bindings.get(name).ok_or_else(|| {
            debug!("Unbound variable {:?} in expression tree", name);
            ExprError::UnboundVariable(name.clone())
        }),
        Expr::Unary(UnaryOperator::Neg, operand) => Ok(-evaluate(operand, bindings)?),
        Expr::Binary(op, left, right) => {
            let left = evaluate(left, bindings)?;
            let right = evaluate(right, bindings)?;
            apply(*op, left, right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn eval(text: &str, a: f64, b: f64) -> Result<f64, ExprError> {
        evaluate(&parse(text)?, &Bindings::new(a, b))
    }

    #[test]
    fn test_bindings() {
        let bindings = Bindings::new(1.5, -2.0);
        assert_eq!(bindings.get("a"), Some(1.5));
        assert_eq!(bindings.get("b"), Some(-2.0));
        assert_eq!(bindings.get("c"), None);
        assert_eq!(bindings.get("A"), None);
        assert_eq!(Bindings::default(), Bindings::new(0.0, 0.0));
    }

    #[test]
    fn test_arithmetic() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(eval("a+b", 2.0, 3.0)?, 5.0);
        assert_eq!(eval("34 +6/ 2", 0.0, 0.0)?, 37.0);
        assert_eq!(eval("(34 +6)/ 2", 0.0, 0.0)?, 20.0);
        assert_eq!(eval("7 / 2", 0.0, 0.0)?, 3.5);
        assert_eq!(eval("a * b - 1", 4.0, 0.25)?, 0.0);
        assert_eq!(eval("2 ^ 3 ^ 2", 0.0, 0.0)?, 512.0);
        assert_eq!(eval("-a", 3.0, 0.0)?, -3.0);
        assert_eq!(eval("-2^2", 0.0, 0.0)?, 4.0);
        assert_eq!(eval("2^-1", 0.0, 0.0)?, 0.5);
        Ok(())
    }

    #[test]
    fn test_floor_division() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(eval("7 // 2", 0.0, 0.0)?, 3.0);
        assert_eq!(eval("7 // -3", 0.0, 0.0)?, -3.0);
        assert_eq!(eval("-7 // 3", 0.0, 0.0)?, -3.0);
        assert_eq!(eval("7.5 // 2", 0.0, 0.0)?, 3.0);
        assert_eq!(eval("1 // 1e308", 0.0, 0.0)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_modulo_takes_divisor_sign() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(eval("7 % -3", 0.0, 0.0)?, -2.0);
        assert_eq!(eval("-7 % 3", 0.0, 0.0)?, 2.0);
        assert_eq!(eval("7 % 3", 0.0, 0.0)?, 1.0);
        assert_eq!(eval("5.5 % 2", 0.0, 0.0)?, 1.5);

        let zero = eval("6 % -3", 0.0, 0.0)?;
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_negative());

        let q = eval("7 // -3", 0.0, 0.0)?;
        let r = eval("7 % -3", 0.0, 0.0)?;
        assert_eq!(7.0, -3.0 * q + r);
        Ok(())
    }

    #[test]
    fn test_division_by_zero() {
        for (text, op) in &[
            ("a/b", BinaryOperator::Div),
            ("a//b", BinaryOperator::FloorDiv),
            ("a%b", BinaryOperator::Mod),
            ("a/-b", BinaryOperator::Div),
        ] {
            match eval(text, 1.0, 0.0) {
                Err(ExprError::DivisionByZero(e)) => assert_eq!(e, *op),
                r => panic!("{} evaluated to {:?}", text, r),
            }
        }
    }

    #[test]
    fn test_non_real_power_is_nan() -> Result<(), Box<dyn std::error::Error>> {
        assert!(eval("(-1)^0.5", 0.0, 0.0)?.is_nan());
        assert!((eval("2^0.5", 0.0, 0.0)? - std::f64::consts::SQRT_2).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_infinite_results() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(eval("10^400", 0.0, 0.0)?, f64::INFINITY);
        assert_eq!(eval("-(10^400)", 0.0, 0.0)?, f64::NEG_INFINITY);
        assert_eq!(eval("a / 1e-308", 1e10, 0.0)?, f64::INFINITY);
        Ok(())
    }

    #[test]
    fn test_unbound_variable() {
        let expr = Expr::binary(BinaryOperator::Add, Expr::variable("a"), Expr::variable("c"));
        match evaluate(&expr, &Bindings::default()) {
            Err(ExprError::UnboundVariable(name)) => assert_eq!(name, "c"),
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn test_hand_built_tree() -> Result<(), Box<dyn std::error::Error>> {
        let expr = Expr::negate(Expr::binary(
            BinaryOperator::Pow,
            Expr::variable("b"),
            Expr::Literal(2.0),
        ));
        assert_eq!(evaluate(&expr, &Bindings::new(0.0, 3.0))?, -9.0);
        Ok(())
    }
}
