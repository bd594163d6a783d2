//! Configuration management for graphdump
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. The built-in registry (`config/graphdump.toml`, embedded at compile time)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use graphdump::config::Config;
//!
//! let config = Config::load(None).expect("Failed to load configuration");
//! println!("Max depth: {}", config.export.max_depth);
//! ```
//!
//! # Environment Variables
//!
//! Scalar settings can be overridden using environment variables with the pattern:
//! `GRAPHDUMP__<section>__<key>`
//!
//! Examples:
//! - `GRAPHDUMP__EXPORT__MAX_DEPTH=64`
//! - `GRAPHDUMP__EXPORT__EXCLUDE_PAYLOAD_FIELDS=false`
//!
//! # Configuration File
//!
//! `--config` names a file that must exist. Without it the file comes from
//! `GRAPHDUMP_CONFIG`, falling back to `config/graphdump.toml`, and is optional.
//! Arrays in a file replace the built-in arrays they name.

mod models;
mod sources;
mod validation;

pub use models::{Config, ContentTable, ExportSettings, FamilyConfig, MetadataTable};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (built-in + file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly given file is missing or malformed
    /// - Validation fails (duplicate types, missing payload rules, etc.)
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path, true)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// The built-in registry with no overrides
    pub fn builtin() -> Result<Self, ConfigError> {
        let config = sources::builtin()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_is_valid() {
        let config = Config::builtin().unwrap();
        assert!(!config.common_skip.is_empty());
        assert!(config.families.sorted_map.contains(&"BTrees.OOBTree.OOBTree".to_string()));
        assert_eq!(config.content.documents.len(), 3);
    }

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
common_skip = ["site.Tool"]

[content]
folder = ["site.Section"]
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.common_skip, vec!["site.Tool".to_string()]);
        assert_eq!(config.content.folder, vec!["site.Section".to_string()]);
    }

    #[test]
    fn test_validation_catches_duplicate_type() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[content]
metadata_only = ["OFS.Folder.Folder"]
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::DuplicateType { .. })
        ));
    }

    #[test]
    fn test_toml_rendering_reloads() {
        let config = Config::builtin().unwrap();
        let rendered = config.to_toml().unwrap();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("rendered.toml");
        fs::write(&config_path, rendered).unwrap();

        let reloaded = Config::load_from_path(config_path).unwrap();
        assert_eq!(reloaded.common_skip, config.common_skip);
        assert_eq!(reloaded.payloads, config.payloads);
        assert_eq!(reloaded.metadata.skip, config.metadata.skip);
    }
}
