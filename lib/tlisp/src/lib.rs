pub use eval::{combine, evaluate, ErrorKind, Value};
pub use expression::{parse, Expr, Literal, Operator, Parser, ParserConfig, SyntaxError};

mod eval;
mod expression;
