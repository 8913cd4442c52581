use figment::{providers::Env, Figment};
use serde::Deserialize;
use strum_macros::AsRefStr;

use expression::EvaluatorConfig;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub a: f64,
    pub b: f64,
    pub prefix: String,
    pub format: OutputFormat,
    pub metrics: bool,
    pub evaluator: EvaluatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            a: 0.0,
            b: 0.0,
            prefix: "Value:".to_string(),
            format: OutputFormat::default(),
            metrics: false,
            evaluator: EvaluatorConfig::default(),
        }
    }
}

/// Configuration from `APP_` prefixed environment variables
///
/// The first `_` after the prefix separates a section, so `APP_EVALUATOR_MAX_DEPTH`
/// sets `evaluator.max_depth`.
pub fn figment() -> Figment {
    Figment::new().merge(Env::prefixed("APP_").map(|s| s.as_str().replacen('_', ".", 1).into()))
}
