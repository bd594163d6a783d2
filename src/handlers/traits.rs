use serde_json::Value as JsonValue;
use std::fmt;

use crate::export::{ExportTarget, Exporter, Result};
use crate::graph::Node;

/// Writes a node into the export tree
///
/// Implementations either create a directory and recurse, write a payload file
/// plus its sidecar, or write only the sidecar metadata.
pub trait ContentHandler: fmt::Debug + Send + Sync {
    /// Short kind name used in logs and configuration
    fn kind(&self) -> &'static str;

    fn export(&self, exporter: &Exporter, node: Node, target: &ExportTarget) -> Result<()>;
}

/// Converts a node found inside metadata into a JSON value
pub trait MetadataHandler: fmt::Debug + Send + Sync {
    fn kind(&self) -> &'static str;

    fn extract(&self, exporter: &Exporter, node: &Node, target: &ExportTarget) -> Result<JsonValue>;
}
