mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{load_catalog, Catalog};

/// Get the config directory path (~/.config/specialty-match/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("specialty-match")
}

/// Get the default config file path (~/.config/specialty-match/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to [`Config::default`] when that file doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => {
            let path = get_config_path();
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Expand a leading `~/` to the home directory. Other paths are returned as-is.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Resolve the catalog to use: an explicit override, then the configured
/// file, then the bundled catalog.
pub fn resolve_catalog(config: &Config, override_path: Option<PathBuf>) -> Result<Catalog> {
    match override_path.or_else(|| config.catalog.clone()) {
        Some(path) => load_catalog(&expand_home(&path)),
        None => Ok(Catalog::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_explicit_missing_config_fails() {
        let path = env::temp_dir().join("specialty_match_test_no_config.yaml");
        let _ = std::fs::remove_file(&path);

        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_explicit_config() {
        let path = env::temp_dir().join("specialty_match_test_config.yaml");
        std::fs::write(&path, "history_limit: 7\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.history_limit, 7);
        assert!(config.catalog.is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_config() {
        let path = env::temp_dir().join("specialty_match_test_bad_config.yaml");
        std::fs::write(&path, "history_limit: [oops\n").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_home(Path::new("~/my-catalog.yaml")),
            home.join("my-catalog.yaml")
        );
        assert_eq!(expand_home(Path::new("~")), home);
        assert_eq!(
            expand_home(Path::new("/etc/catalog.yaml")),
            PathBuf::from("/etc/catalog.yaml")
        );
        assert_eq!(
            expand_home(Path::new("~other/catalog.yaml")),
            PathBuf::from("~other/catalog.yaml")
        );
    }

    #[test]
    fn test_resolve_configured_catalog_expands_home() {
        let home = dirs::home_dir().unwrap();
        let name = "specialty_match_test_no_such_home_catalog.yaml";
        let _ = std::fs::remove_file(home.join(name));

        let config = Config {
            catalog: Some(PathBuf::from("~").join(name)),
            ..Config::default()
        };
        let err = resolve_catalog(&config, None).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(&home.join(name).display().to_string()));
        assert!(!message.contains("~/"));
    }

    #[test]
    fn test_resolve_builtin_catalog() {
        let catalog = resolve_catalog(&Config::default(), None).unwrap();
        assert_eq!(catalog, Catalog::builtin());
    }

    #[test]
    fn test_resolve_override_wins() {
        let path = env::temp_dir().join("specialty_match_test_override_catalog.yaml");
        let yaml = r#"
fallback: gp
categories:
  - key: gp
    name: { base: "GP" }
    description: { base: "General practice" }
questions:
  - id: 1
    prompt: { base: "Ready?" }
    options:
      - id: y
        prompt: { base: "Yes" }
        weights: { gp: 1 }
"#;
        std::fs::write(&path, yaml).unwrap();

        let config = Config {
            catalog: Some(env::temp_dir().join("specialty_match_test_not_used.yaml")),
            ..Config::default()
        };
        let catalog = resolve_catalog(&config, Some(path.clone())).unwrap();
        assert_eq!(catalog.fallback, "gp");
        assert_eq!(catalog.questions.len(), 1);

        let _ = std::fs::remove_file(&path);
    }
}
