use log::{error, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use telemetry::Measure;
use tlisp::{evaluate, Parser, Value};

use crate::config::{Config, ReplConfig};
use crate::error::ReplError;
use crate::render;

lazy_static! {
    static ref PARSE_MEASURE: Measure = Measure::new("parser", "parse");
    static ref EVALUATE_MEASURE: Measure = Measure::new("evaluator", "evaluate");
}

pub struct Repl {
    config: ReplConfig,
    parser: Parser,
}

impl Repl {
    pub fn new(config: &Config) -> Repl {
        Repl {
            config: config.repl.clone(),
            parser: Parser::new(&config.parser),
        }
    }

    pub fn eval_line(&self, line: &str) -> Result<Value, ReplError> {
        let expr = PARSE_MEASURE.stats(|| self.parser.parse(line).map_err(ReplError::from))?;
        EVALUATE_MEASURE.stats(|| Ok(evaluate(&expr)))
    }

    /// The text to print in reply to a line of input.
    pub fn respond(&self, line: &str) -> Result<String, ReplError> {
        match self.eval_line(line) {
            Ok(value) => render::value(self.config.format, &value),
            Err(ReplError::InvalidExpression(e)) => {
                render::syntax_error(self.config.format, line, &e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn run(&self) -> Result<(), ReplError> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &self.config.history {
            if let Err(e) = editor.load_history(path) {
                info!("No history loaded from {}: {}", path.display(), e);
            }
        }

        if self.config.banner {
            println!("Toy testing lisp repl");
            println!("Press Ctrl+c to Exit\n");
        }

        loop {
            match editor.readline(&self.config.prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(line)?;

                    match line {
                        ":quit" | ":exit" => break,
                        ":metrics" => match telemetry::encode() {
                            Ok(metrics) => print!("{}", metrics),
                            Err(e) => error!("Failed to encode metrics: {}", e),
                        },
                        _ => println!("{}", self.respond(line)?),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(path) = &self.config.history {
            editor.save_history(path)?;
        }
        Ok(())
    }
}
