use serde::Deserialize;

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Maximum parenthesis nesting and tree depth accepted by the parser
    pub max_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
