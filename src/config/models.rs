use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::export::DEFAULT_MAX_DEPTH;
use crate::graph::{Classifier, Family};
use crate::handlers::PayloadRule;

/// Top-level configuration
///
/// `common_skip` stays first so the TOML rendering puts plain values ahead of
/// tables.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Infrastructure types skipped by both registries
    #[serde(default)]
    pub common_skip: Vec<String>,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub families: FamilyConfig,
    #[serde(default)]
    pub content: ContentTable,
    #[serde(default)]
    pub metadata: MetadataTable,
    /// Payload profile name -> rules tried in order
    #[serde(default)]
    pub payloads: BTreeMap<String, Vec<PayloadRule>>,
}

/// Walk behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportSettings {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Field holding the shard container of large folders
    #[serde(default = "default_shard_field")]
    pub shard_field: String,
    /// Field holding the encoded value of timestamp objects
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,
    #[serde(default = "default_exclude_payload_fields")]
    pub exclude_payload_fields: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            shard_field: default_shard_field(),
            timestamp_field: default_timestamp_field(),
            exclude_payload_fields: default_exclude_payload_fields(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_shard_field() -> String {
    "_tree".to_string()
}

fn default_timestamp_field() -> String {
    "_t".to_string()
}

fn default_exclude_payload_fields() -> bool {
    true
}

/// Declared family membership, used by the classifier
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FamilyConfig {
    #[serde(default)]
    pub sorted_map: Vec<String>,
    #[serde(default)]
    pub sorted_set: Vec<String>,
    #[serde(default)]
    pub persistent: Vec<String>,
}

impl FamilyConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier::new()
            .with_family(Family::SortedMap, self.sorted_map.iter().cloned())
            .with_family(Family::SortedSet, self.sorted_set.iter().cloned())
            .with_family(Family::Persistent, self.persistent.iter().cloned())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Family, &str)> {
        fn tag(family: Family, names: &[String]) -> impl Iterator<Item = (Family, &str)> {
            names.iter().map(move |name| (family, name.as_str()))
        }

        tag(Family::SortedMap, &self.sorted_map)
            .chain(tag(Family::SortedSet, &self.sorted_set))
            .chain(tag(Family::Persistent, &self.persistent))
    }
}

/// Content registry, grouped by handler kind
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContentTable {
    #[serde(default)]
    pub skip: Vec<String>,
    #[serde(default)]
    pub folder: Vec<String>,
    #[serde(default)]
    pub large_folder: Vec<String>,
    #[serde(default)]
    pub metadata_only: Vec<String>,
    /// Payload profile name -> document types using it
    #[serde(default)]
    pub documents: BTreeMap<String, Vec<String>>,
}

impl ContentTable {
    /// Every (kind, type name) pair, documents labelled by profile
    pub fn entries(&self) -> Vec<(String, &str)> {
        let mut entries = Vec::new();
        for (kind, names) in [
            ("skip", &self.skip),
            ("folder", &self.folder),
            ("large_folder", &self.large_folder),
            ("metadata_only", &self.metadata_only),
        ] {
            entries.extend(names.iter().map(|name| (kind.to_string(), name.as_str())));
        }
        for (profile, names) in &self.documents {
            entries.extend(
                names
                    .iter()
                    .map(|name| (format!("documents.{profile}"), name.as_str())),
            );
        }
        entries
    }
}

/// Metadata registry, grouped by handler kind
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetadataTable {
    #[serde(default)]
    pub skip: Vec<String>,
    #[serde(default)]
    pub mapping: Vec<String>,
    #[serde(default)]
    pub sequence: Vec<String>,
    #[serde(default)]
    pub tuple: Vec<String>,
    #[serde(default)]
    pub raw_scalar: Vec<String>,
    #[serde(default)]
    pub timestamp: Vec<String>,
}

impl MetadataTable {
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("skip", &self.skip),
            ("mapping", &self.mapping),
            ("sequence", &self.sequence),
            ("tuple", &self.tuple),
            ("raw_scalar", &self.raw_scalar),
            ("timestamp", &self.timestamp),
        ]
        .into_iter()
        .flat_map(|(kind, names)| names.iter().map(move |name| (kind, name.as_str())))
        .collect()
    }
}
