use derive_more::Display;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::expression::{Expr, Literal, Operator};

#[derive(Debug, Display, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[display(fmt = "Error: Division by zero!")]
    DivisionByZero,

    #[display(fmt = "Error: Modulo by zero!")]
    ModuloByZero,

    #[display(fmt = "Error: Invalid Operator!")]
    BadOperator,

    #[display(fmt = "Error: Invalid Number!")]
    BadNumber,

    #[display(fmt = "Error: Integer overflow!")]
    Overflow,
}

impl std::error::Error for ErrorKind {}

/// The result of evaluating an expression. Errors are ordinary values.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type", content = "value")]
pub enum Value {
    #[display(fmt = "{}", _0)]
    Num(i64),

    #[display(fmt = "{}", _0)]
    Err(ErrorKind),
}

impl Value {
    pub fn into_result(self) -> Result<i64, ErrorKind> {
        match self {
            Value::Num(x) => Ok(x),
            Value::Err(e) => Err(e),
        }
    }
}

impl From<Result<i64, ErrorKind>> for Value {
    fn from(r: Result<i64, ErrorKind>) -> Self {
        match r {
            Ok(x) => Value::Num(x),
            Err(e) => Value::Err(e),
        }
    }
}

fn checked(x: Option<i64>) -> Result<i64, ErrorKind> {
    x.ok_or(ErrorKind::Overflow)
}

// Truncates the real-valued power back to an integer
fn pow(base: i64, exponent: i64) -> Result<i64, ErrorKind> {
    let odd = exponent % 2 != 0;
    match base {
        0 if exponent < 0 => Err(ErrorKind::DivisionByZero),
        0 if exponent == 0 => Ok(1),
        0 | 1 => Ok(base),
        -1 if odd => Ok(-1),
        -1 => Ok(1),
        _ if exponent < 0 => Ok(0),
        _ if exponent > u32::MAX as i64 => Err(ErrorKind::Overflow),
        _ => checked(base.checked_pow(exponent as u32)),
    }
}

fn apply(op: Operator, a: i64, b: i64) -> Result<i64, ErrorKind> {
    match op {
        Operator::Add => checked(a.checked_add(b)),
        Operator::Sub => checked(a.checked_sub(b)),
        Operator::Mul => checked(a.checked_mul(b)),
        Operator::Div if b == 0 => Err(ErrorKind::DivisionByZero),
        Operator::Div => checked(a.checked_div(b)),
        Operator::Rem if b == 0 => Err(ErrorKind::ModuloByZero),
        Operator::Rem => Ok(a.wrapping_rem(b)),
        Operator::Pow => pow(a, b),
        Operator::Min => Ok(a.min(b)),
        Operator::Max => Ok(a.max(b)),
    }
}

/// Combines an accumulator with the next operand.
///
/// An error on either side is returned unchanged, the left one first.
pub fn combine(op: Operator, left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Err(e), _) | (_, Value::Err(e)) => Value::Err(e),
        (Value::Num(a), Value::Num(b)) => apply(op, a, b).into(),
    }
}

fn eval_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Int(x) => Value::Num(*x),
        Literal::OutOfRange(digits) => {
            debug!("Literal {} does not fit in 64 bits", digits);
            Value::Err(ErrorKind::BadNumber)
        }
    }
}

/// Reduces an expression to a value.
///
/// Operands are folded left to right and evaluation stops at the first error.
pub fn evaluate(e: &Expr) -> Value {
    match e {
        Expr::Number(literal) => eval_literal(literal),
        Expr::Application(op, operands) => {
            let (first, rest) = match operands.split_first() {
                Some(split) => split,
                None => return Value::Err(ErrorKind::BadOperator),
            };

            let mut acc = evaluate(first);
            for operand in rest {
                if let Value::Err(_) = acc {
                    break;
                }
                acc = combine(*op, acc, evaluate(operand));
            }

            if let Value::Err(kind) = acc {
                debug!("Evaluating {} failed: {:?}", e, kind);
            }
            acc
        }
    }
}
