//! Evaluation of short arithmetic expressions over two variables, `a` and `b`
//!
//! Only number literals, the two variables, `+ - * / // % ^` (`**` is accepted
//! for `^`), unary minus and parentheses are accepted. Anything else is rejected
//! while parsing, before a tree exists.

use log::{debug, trace};

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use config::{EvaluatorConfig, DEFAULT_MAX_DEPTH};
pub use error::{Construct, ExprError};
pub use eval::{apply, evaluate, Bindings};
pub use outcome::{finalize, Evaluation};
pub use parser::{parse, Grammar};

mod ast;
mod config;
mod error;
mod eval;
mod outcome;
mod parser;

#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator {
    grammar: Grammar,
}

impl Calculator {
    pub fn new(config: &EvaluatorConfig) -> Calculator {
        Calculator {
            grammar: Grammar::new(config.max_depth),
        }
    }

    pub fn evaluate_math(&self, expression: &str, a: f64, b: f64) -> Result<Evaluation, ExprError> {
        let expr = self.grammar.parse(expression)?;
        let raw = evaluate(&expr, &Bindings::new(a, b)).map_err(|e| {
            debug!("Failed to evaluate {:?}: {}", expression, e);
            e
        })?;
        let result = finalize(raw);

        trace!("{:?} with a={} b={} = {:?}", expression, a, b, result);
        Ok(result)
    }
}

/// Evaluates `expression` with the default depth limit
pub fn evaluate_math(expression: &str, a: f64, b: f64) -> Result<Evaluation, ExprError> {
    Calculator::default().evaluate_math(expression, a, b)
}
