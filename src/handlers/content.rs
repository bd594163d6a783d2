use tracing::debug;

use crate::export::{ExportError, ExportTarget, Exporter, Result};
use crate::graph::{Node, Value};

use super::payload::{self, PayloadRule};
use super::traits::ContentHandler;

/// Creates a directory, writes the folder's sidecar and recurses
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderHandler;

impl ContentHandler for FolderHandler {
    fn kind(&self) -> &'static str {
        "folder"
    }

    fn export(&self, exporter: &Exporter, node: Node, target: &ExportTarget) -> Result<()> {
        exporter.create_dir(target)?;
        exporter.write_metadata(&node, target, None)?;
        exporter.walk(&node, target)
    }
}

/// Folder whose children live one level down, in a shard container
///
/// The shard is unwrapped and exported as an ordinary folder under the same
/// name, so nothing of the shard layer shows up in output paths.
#[derive(Debug, Clone)]
pub struct LargeFolderHandler {
    shard_field: String,
}

impl LargeFolderHandler {
    pub fn new(shard_field: impl Into<String>) -> Self {
        Self {
            shard_field: shard_field.into(),
        }
    }
}

impl ContentHandler for LargeFolderHandler {
    fn kind(&self) -> &'static str {
        "large_folder"
    }

    fn export(&self, exporter: &Exporter, node: Node, target: &ExportTarget) -> Result<()> {
        let shard = match node.field(&self.shard_field) {
            Some(Value::Object(obj)) => exporter.node(obj.clone())?,
            _ => {
                return Err(ExportError::MissingField {
                    type_name: node.type_name().to_string(),
                    field: self.shard_field.clone(),
                    path: target.content_path(),
                });
            }
        };
        FolderHandler.export(exporter, shard, target)
    }
}

/// Writes a payload file located through an ordered list of rules
#[derive(Debug, Clone)]
pub struct DocumentHandler {
    profile: String,
    rules: Vec<PayloadRule>,
}

impl DocumentHandler {
    pub fn new(profile: impl Into<String>, rules: Vec<PayloadRule>) -> Self {
        Self {
            profile: profile.into(),
            rules,
        }
    }
}

impl ContentHandler for DocumentHandler {
    fn kind(&self) -> &'static str {
        "document"
    }

    fn export(&self, exporter: &Exporter, node: Node, target: &ExportTarget) -> Result<()> {
        let resolved = payload::resolve(&self.rules, &node, exporter.classifier(), target)?;
        debug!(
            profile = %self.profile,
            type_name = node.type_name(),
            "Resolved payload"
        );
        exporter.write_content(
            &node,
            target,
            resolved.payload,
            resolved.source_field.as_ref(),
        )
    }
}

/// Writes only the sidecar metadata file
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataOnlyHandler;

impl ContentHandler for MetadataOnlyHandler {
    fn kind(&self) -> &'static str {
        "metadata_only"
    }

    fn export(&self, exporter: &Exporter, node: Node, target: &ExportTarget) -> Result<()> {
        exporter.write_metadata(&node, target, None)
    }
}
