use serde::Serialize;

use tlisp::{SyntaxError, Value};

use crate::config::OutputFormat;
use crate::error::ReplError;

#[derive(Serialize)]
#[serde(tag = "type", rename = "syntax_error")]
struct SyntaxErrorResponse<'a> {
    position: usize,
    expected: &'a str,
    found: Option<char>,
}

/// Underlines the column of a syntax error, keeping tabs so the caret lines up.
fn caret(line: &str, e: &SyntaxError) -> String {
    let indent: String = line
        .chars()
        .take(e.column - 1)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    format!("{}^", indent)
}

pub fn value(format: OutputFormat, value: &Value) -> Result<String, ReplError> {
    match format {
        OutputFormat::Text => Ok(value.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
    }
}

pub fn syntax_error(
    format: OutputFormat,
    line: &str,
    e: &SyntaxError,
) -> Result<String, ReplError> {
    match format {
        OutputFormat::Text => Ok(format!("{}\n{}\n{}", e, line, caret(line, e))),
        OutputFormat::Json => Ok(serde_json::to_string(&SyntaxErrorResponse {
            position: e.position,
            expected: &e.expected,
            found: e.found,
        })?),
    }
}
