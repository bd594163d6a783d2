use super::models::Config;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Type '{type_name}' is listed as both '{first}' and '{second}' in the {table} table")]
    DuplicateType {
        table: &'static str,
        type_name: String,
        first: String,
        second: String,
    },

    #[error("Type '{type_name}' is declared in both the '{first}' and '{second}' families")]
    ConflictingFamily {
        type_name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Document profile '{profile}' has no payload rules")]
    MissingPayloadProfile { profile: String },

    #[error("Payload rule {index} of profile '{profile}' has an empty read path")]
    EmptyReadPath { profile: String, index: usize },

    #[error("Empty type name in the {table} table")]
    EmptyTypeName { table: &'static str },

    #[error("max_depth must be positive")]
    InvalidMaxDepth,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_export(config)?;
    validate_families(config)?;
    validate_content(config)?;
    validate_metadata(config)?;
    validate_payloads(config)?;
    Ok(())
}

fn validate_export(config: &Config) -> Result<(), ValidationError> {
    if config.export.max_depth == 0 {
        return Err(ValidationError::InvalidMaxDepth);
    }
    Ok(())
}

/// A type may belong to at most one family
fn validate_families(config: &Config) -> Result<(), ValidationError> {
    let mut seen = HashMap::new();
    for (family, type_name) in config.families.iter() {
        if type_name.is_empty() {
            return Err(ValidationError::EmptyTypeName { table: "families" });
        }
        if let Some(first) = seen.insert(type_name, family) {
            return Err(ValidationError::ConflictingFamily {
                type_name: type_name.to_string(),
                first: first.as_str(),
                second: family.as_str(),
            });
        }
    }
    Ok(())
}

fn validate_content(config: &Config) -> Result<(), ValidationError> {
    let entries = config.content.entries();
    check_unique(
        "content",
        entries.iter().map(|(kind, name)| (kind.as_str(), *name)),
    )?;

    for (profile, type_names) in &config.content.documents {
        let has_rules = config
            .payloads
            .get(profile)
            .is_some_and(|rules| !rules.is_empty());
        if !has_rules && !type_names.is_empty() {
            return Err(ValidationError::MissingPayloadProfile {
                profile: profile.clone(),
            });
        }
    }
    Ok(())
}

fn validate_metadata(config: &Config) -> Result<(), ValidationError> {
    check_unique("metadata", config.metadata.entries().into_iter())?;
    if config.common_skip.iter().any(String::is_empty) {
        return Err(ValidationError::EmptyTypeName {
            table: "common_skip",
        });
    }
    Ok(())
}

fn validate_payloads(config: &Config) -> Result<(), ValidationError> {
    for (profile, rules) in &config.payloads {
        for (index, rule) in rules.iter().enumerate() {
            if rule.read.is_empty() {
                return Err(ValidationError::EmptyReadPath {
                    profile: profile.clone(),
                    index,
                });
            }
        }
    }
    Ok(())
}

/// Every type name appears under at most one handler kind
fn check_unique<'a>(
    table: &'static str,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(), ValidationError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (kind, type_name) in entries {
        if type_name.is_empty() {
            return Err(ValidationError::EmptyTypeName { table });
        }
        if let Some(first) = seen.insert(type_name, kind) {
            if first != kind {
                return Err(ValidationError::DuplicateType {
                    table,
                    type_name: type_name.to_string(),
                    first: first.to_string(),
                    second: kind.to_string(),
                });
            }
        }
    }
    Ok(())
}
