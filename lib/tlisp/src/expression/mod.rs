use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use parser::{parse, Parser, ParserConfig, SyntaxError};

mod parser;

#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Rem,
    #[strum(serialize = "^")]
    Pow,
    #[strum(serialize = "min")]
    Min,
    #[strum(serialize = "max")]
    Max,
}

/// A numeric literal as written in the source.
///
/// Literals too wide for an `i64` keep their text so that evaluation can
/// report them rather than the parser rejecting the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type", content = "value")]
pub enum Literal {
    Int(i64),
    OutOfRange(String),
}

impl Literal {
    pub fn from_digits(digits: &str) -> Literal {
        match digits.parse() {
            Ok(x) => Literal::Int(x),
            Err(_) => Literal::OutOfRange(digits.to_string()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(x) => write!(f, "{}", x),
            Literal::OutOfRange(digits) => f.write_str(digits),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Number(Literal),
    Application(Operator, Vec<Expr>),
}

impl From<i64> for Expr {
    fn from(x: i64) -> Self {
        Expr::Number(Literal::Int(x))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(literal) => write!(f, "{}", literal),
            Expr::Application(op, operands) => {
                write!(f, "({}", op)?;
                for operand in operands {
                    write!(f, " {}", operand)?;
                }
                write!(f, ")")
            }
        }
    }
}
