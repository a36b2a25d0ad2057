use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use tlisp::ParserConfig;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: String,
    pub banner: bool,
    // File to load history from and save it to on exit
    pub history: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: "tlisp > ".to_string(),
            banner: true,
            history: None,
            format: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub repl: ReplConfig,
}

/// Defaults, then `tlisp.toml`, then `APP_` environment variables.
///
/// The first `_` after the prefix separates the section from the key, so
/// `APP_PARSER_MAX_DEPTH` sets `parser.max_depth`.
pub fn figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file("tlisp.toml"))
        .merge(Env::prefixed("APP_").map(|s| s.as_str().replacen('_', ".", 1).into()))
}
