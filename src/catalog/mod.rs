mod types;
mod validation;

pub use types::{AnswerOption, Catalog, Category, Locale, Localized, Question};
pub use validation::validate_catalog;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("default.yaml");

impl Catalog {
    /// The specialty catalog bundled with the binary.
    pub fn builtin() -> Self {
        // default.yaml is compiled in; test_builtin_catalog_parses keeps it valid
        Self::from_yaml(BUILTIN_CATALOG).expect("bundled catalog must parse")
    }

    /// The bundled catalog as YAML, for users who want to edit their own copy.
    pub fn builtin_yaml() -> &'static str {
        BUILTIN_CATALOG
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_saphyr::from_str(content).context("Failed to parse catalog: invalid YAML")
    }
}

/// Load a catalog from a YAML file.
///
/// The catalog is only parsed here; call [`validate_catalog`] before using it.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;

    let catalog = Catalog::from_yaml(&content)
        .with_context(|| format!("Invalid catalog in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        categories = catalog.categories.len(),
        questions = catalog.questions.len(),
        "loaded catalog"
    );

    Ok(catalog)
}
