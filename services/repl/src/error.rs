use derive_more::Display;
use rustyline::error::ReadlineError;

use telemetry::IsErr;
use tlisp::SyntaxError;

#[derive(Debug, Display)]
pub enum ReplError {
    #[display(fmt = "Readline Error: {}", _0)]
    ReadlineError(String),

    #[display(fmt = "IO Error: {}", _0)]
    IOError(String),

    #[display(fmt = "Serialization Error: {}", _0)]
    SerializeError(String),

    #[display(fmt = "{}", _0)]
    InvalidExpression(SyntaxError),
}

impl std::error::Error for ReplError {}

impl From<ReadlineError> for ReplError {
    fn from(e: ReadlineError) -> Self {
        match e {
            ReadlineError::Io(e) => Self::IOError(e.to_string()),
            e => Self::ReadlineError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ReplError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializeError(e.to_string())
    }
}

impl From<SyntaxError> for ReplError {
    fn from(e: SyntaxError) -> Self {
        Self::InvalidExpression(e)
    }
}

impl IsErr for ReplError {
    fn is_err(&self) -> bool {
        !matches!(self, ReplError::InvalidExpression(_))
    }
}
