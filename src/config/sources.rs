use super::models::Config;
use config::{ConfigError, Environment, File, FileFormat};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "GRAPHDUMP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/graphdump.toml";
const ENV_PREFIX: &str = "GRAPHDUMP";
const ENV_SEPARATOR: &str = "__";

/// Registry shipped with the binary
pub(crate) const BUILTIN: &str = include_str!("../../config/graphdump.toml");

/// Load configuration from multiple sources with priority:
/// 1. Built-in registry
/// 2. TOML file (explicit path required, default path optional)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load(explicit: Option<PathBuf>) -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    match explicit {
        Some(path) => load_from_sources(path, true),
        None => {
            let path = env::var(CONFIG_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
            load_from_sources(path, false)
        }
    }
}

/// Built-in registry only, no file or environment overrides
pub fn builtin() -> Result<Config, ConfigError> {
    config::Config::builder()
        .add_source(File::from_str(BUILTIN, FileFormat::Toml))
        .build()?
        .try_deserialize()
}

/// Load configuration from a specific path and environment
///
/// A missing file is an error only when `required` is set.
pub fn load_from_sources(config_path: PathBuf, required: bool) -> Result<Config, ConfigError> {
    let mut builder =
        config::Config::builder().add_source(File::from_str(BUILTIN, FileFormat::Toml));

    if config_path.exists() || required {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(required));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using built-in registry and environment overrides",
            config_path.display()
        );
    }

    // GRAPHDUMP__EXPORT__MAX_DEPTH -> export.max_depth
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_builtin_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path, false).unwrap();
        assert_eq!(config.export.max_depth, 256);
        assert!(config.content.folder.contains(&"OFS.Folder.Folder".to_string()));
        assert!(config.payloads.contains_key("document"));
    }

    #[test]
    fn test_missing_required_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        assert!(load_from_sources(config_path, true).is_err());
    }

    #[test]
    fn test_file_overrides_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[export]
max_depth = 12
shard_field = "_objects"

[content]
folder = ["site.Section"]
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path, true).unwrap();
        assert_eq!(config.export.max_depth, 12);
        assert_eq!(config.export.shard_field, "_objects");
        assert_eq!(config.content.folder, vec!["site.Section".to_string()]);
        // untouched sections keep the built-in values
        assert!(config.metadata.mapping.contains(&"builtin.dict".to_string()));
        assert_eq!(config.export.timestamp_field, "_t");
    }

    #[test]
    fn test_builtin_payload_rules() {
        let config = builtin().unwrap();
        let rules = &config.payloads["document"];

        assert_eq!(rules.len(), 6);
        assert_eq!(rules[0].when, vec!["cooked_text".to_string()]);
        assert_eq!(rules[0].read, vec!["text".to_string()]);
        assert_eq!(
            config.payloads["blog_entry"][0].read,
            vec!["body".to_string(), "raw".to_string()]
        );
    }
}
