use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::Locale;

fn default_history_limit() -> usize {
    20
}

/// User configuration.
///
/// Example YAML:
/// ```yaml
/// catalog: ~/my-catalog.yaml
/// locale: localized
/// history_limit: 50
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Custom catalog file. The bundled catalog is used when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    #[serde(default)]
    pub locale: Locale,

    /// How many finished quizzes to keep in history (default: 20)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            locale: Locale::Base,
            history_limit: default_history_limit(),
        }
    }
}
