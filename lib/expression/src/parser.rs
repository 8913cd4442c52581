use log::debug;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of, space0},
    combinator::{map, map_res, opt, recognize, value},
    error::{ErrorKind, ParseError},
    sequence::{pair, tuple},
    IResult,
};

use crate::ast::{BinaryOperator, Expr};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{Construct, ExprError};

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "lambda", "nonlocal", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Why the grammar stopped
#[derive(Debug, Clone, PartialEq)]
enum Halt<'a> {
    Unexpected {
        input: &'a str,
        expected: &'static str,
    },
    TooComplex,
}

impl<'a> ParseError<&'a str> for Halt<'a> {
    fn from_error_kind(input: &'a str, _: ErrorKind) -> Self {
        Halt::Unexpected {
            input,
            expected: "valid token",
        }
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

type Res<'a, T> = IResult<&'a str, T, Halt<'a>>;

fn unexpected<'a, T>(input: &'a str, expected: &'static str) -> Res<'a, T> {
    Err(nom::Err::Error(Halt::Unexpected { input, expected }))
}

fn skip(i: &str) -> Res<'_, &str> {
    space0(i)
}

fn open_paren(i: &str) -> Res<'_, char> {
    char('(')(i)
}

fn close_paren(i: &str) -> Res<'_, char> {
    char(')')(i)
}

fn minus(i: &str) -> Res<'_, char> {
    char('-')(i)
}

fn number(i: &str) -> Res<'_, f64> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = tuple((one_of("eE"), opt(one_of("+-")), digit1));

    map_res(recognize(pair(mantissa, opt(exponent))), |s: &str| {
        s.parse::<f64>()
    })(i)
}

fn identifier(i: &str) -> Res<'_, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(i)
}

fn binary_operator(i: &str) -> Res<'_, BinaryOperator> {
    alt((
        value(BinaryOperator::Pow, tag("**")),
        value(BinaryOperator::FloorDiv, tag("//")),
        value(BinaryOperator::Add, char('+')),
        value(BinaryOperator::Sub, char('-')),
        value(BinaryOperator::Mul, char('*')),
        value(BinaryOperator::Div, char('/')),
        value(BinaryOperator::Mod, char('%')),
        value(BinaryOperator::Pow, char('^')),
    ))(i)
}

fn classify_word(word: &str) -> Construct {
    match word {
        "and" | "or" | "not" => Construct::BooleanOperator,
        "is" | "in" => Construct::Comparison,
        w if KEYWORDS.contains(&w) => Construct::Keyword,
        _ => Construct::Name,
    }
}

/// Recognises the start of a construct a general purpose grammar would accept
fn foreign(i: &str) -> Res<'_, Construct> {
    alt((
        map(identifier, classify_word),
        value(Construct::StringLiteral, one_of("'\"")),
        value(Construct::AttributeAccess, pair(char('.'), identifier)),
        value(
            Construct::Comparison,
            alt((tag("=="), tag("!="), tag("<="), tag(">="))),
        ),
        value(Construct::Assignment, alt((tag(":="), tag("=")))),
        value(
            Construct::BitwiseOperator,
            alt((tag("<<"), tag(">>"), tag("&"), tag("|"), tag("~"))),
        ),
        value(Construct::Comparison, one_of("<>")),
        value(Construct::Subscript, char('[')),
        value(Construct::Call, char('(')),
        value(Construct::Collection, one_of("{,")),
        value(Construct::MultipleStatements, one_of(";\n\r")),
        value(Construct::SliceOrAnnotation, char(':')),
        value(Construct::MatrixMultiply, char('@')),
        value(Construct::UnaryPlus, char('+')),
    ))(i)
}

struct Tree {
    expr: Expr,
    depth: usize,
}

impl Tree {
    fn leaf(expr: Expr) -> Tree {
        Tree { expr, depth: 1 }
    }
}

/// Recursive descent parser for the arithmetic whitelist
///
/// ```text
/// expression := binary
/// binary     := unary (operator unary)*     precedence climbing, `^` right associative
/// unary      := "-" unary | atom
/// atom       := number | "a" | "b" | "(" binary ")"
/// ```
///
/// `limit` bounds both the nesting of parentheses, negations and powers, and the
/// depth of the resulting tree.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    limit: usize,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::new(DEFAULT_MAX_DEPTH)
    }
}

impl Grammar {
    pub fn new(limit: usize) -> Grammar {
        Grammar { limit }
    }

    pub fn parse(&self, text: &str) -> Result<Expr, ExprError> {
        let result = match self.expression(text) {
            Ok((_, tree)) => Ok(tree.expr),
            Err(nom::Err::Error(halt)) | Err(nom::Err::Failure(halt)) => {
                Err(self.reject(text, halt))
            }
            Err(nom::Err::Incomplete(_)) => Err(ExprError::Syntax {
                position: text.len(),
                message: "Incomplete input".to_string(),
            }),
        };

        if let Err(e) = &result {
            debug!("Rejected expression {:?}: {}", text, e);
        }
        result
    }

    fn expression<'a>(&self, text: &'a str) -> Res<'a, Tree> {
        let (rest, tree) = self.binary(text.trim_start(), 0, 0)?;
        if !rest.trim().is_empty() {
            let (rest, _) = skip(rest)?;
            return unexpected(rest, "operator or end of input");
        }
        Ok(("", tree))
    }

    fn reject(&self, text: &str, halt: Halt<'_>) -> ExprError {
        let (input, expected) = match halt {
            Halt::TooComplex => return ExprError::TooComplex { limit: self.limit },
            Halt::Unexpected { input, expected } => (input, expected),
        };
        let position = text.len() - input.len();

        if let Ok((rest, construct)) = foreign(input) {
            return ExprError::UnsupportedConstruct {
                construct,
                position,
                fragment: input[..input.len() - rest.len()].to_string(),
            };
        }

        let message = match input.chars().next() {
            Some(c) => format!("Unexpected token {:?}, expected {}", c, expected),
            None => format!("Unexpected end of input, expected {}", expected),
        };
        ExprError::Syntax { position, message }
    }

    fn enter<'a>(&self, level: usize) -> Result<usize, nom::Err<Halt<'a>>> {
        if level >= self.limit {
            return Err(nom::Err::Failure(Halt::TooComplex));
        }
        Ok(level + 1)
    }

    fn node<'a>(&self, expr: Expr, depth: usize) -> Result<Tree, nom::Err<Halt<'a>>> {
        if depth > self.limit {
            return Err(nom::Err::Failure(Halt::TooComplex));
        }
        Ok(Tree { expr, depth })
    }

    fn binary<'a>(&self, i: &'a str, min_precedence: u8, level: usize) -> Res<'a, Tree> {
        let (mut i, mut left) = self.unary(i, level)?;

        loop {
            let (rest, op) = match pair(skip, binary_operator)(i) {
                Ok((rest, (_, op))) if op.precedence() >= min_precedence => (rest, op),
                Ok(_) | Err(nom::Err::Error(_)) => break,
                Err(e) => return Err(e),
            };

            let (rest, right) = if op.is_right_associative() {
                let level = self.enter(level)?;
                self.binary(rest, op.precedence(), level)?
            } else {
                self.binary(rest, op.precedence() + 1, level)?
            };

            let depth = 1 + left.depth.max(right.depth);
            left = self.node(Expr::binary(op, left.expr, right.expr), depth)?;
            i = rest;
        }

        Ok((i, left))
    }

    fn unary<'a>(&self, i: &'a str, level: usize) -> Res<'a, Tree> {
        let (i, _) = skip(i)?;

        if let Ok((rest, _)) = minus(i) {
            let level = self.enter(level)?;
            let (rest, operand) = self.unary(rest, level)?;
            let depth = operand.depth + 1;
            return Ok((rest, self.node(Expr::negate(operand.expr), depth)?));
        }

        self.atom(i, level)
    }

    fn atom<'a>(&self, i: &'a str, level: usize) -> Res<'a, Tree> {
        if let Ok((rest, v)) = number(i) {
            return Ok((rest, Tree::leaf(Expr::Literal(v))));
        }

        if let Ok((rest, name)) = identifier(i) {
            return match name {
                "a" | "b" => Ok((rest, Tree::leaf(Expr::variable(name)))),
                _ => unexpected(i, "operand"),
            };
        }

        if let Ok((rest, _)) = open_paren(i) {
            let level = self.enter(level)?;
            let (rest, inner) = self.binary(rest, 0, level)?;
            let (rest, _) = skip(rest)?;
            return match close_paren(rest) {
                Ok((rest, _)) => Ok((rest, inner)),
                Err(_) => unexpected(rest, "')'"),
            };
        }

        unexpected(i, "operand")
    }
}

/// Parses `text` with the default depth limit
pub fn parse(text: &str) -> Result<Expr, ExprError> {
    Grammar::default().parse(text)
}
