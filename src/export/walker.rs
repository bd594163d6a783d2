use std::fs;
use tracing::{debug, info};

use super::error::{ExportError, RegistryKind, Result};
use super::target::ExportTarget;
use crate::config::Config;
use crate::graph::{Child, Classifier, Key, Node, ObjectHandle};
use crate::handlers::{ContentHandler, Dispatch, DispatchRegistry, FolderHandler, RegistryError};
use crate::observability::{ExportStats, ExportSummary};

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Walks a graph and mirrors it onto the file system
#[derive(Debug, bon::Builder)]
pub struct Exporter {
    registry: DispatchRegistry,
    #[builder(default)]
    classifier: Classifier,
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Leave the field a payload was read from out of the sidecar
    #[builder(default = true)]
    exclude_payload_fields: bool,
    #[builder(skip)]
    stats: ExportStats,
}

impl Exporter {
    pub fn from_config(config: &Config) -> std::result::Result<Self, RegistryError> {
        Ok(Self::builder()
            .registry(DispatchRegistry::from_config(config)?)
            .classifier(config.families.classifier())
            .max_depth(config.export.max_depth)
            .exclude_payload_fields(config.export.exclude_payload_fields)
            .build())
    }

    pub fn registry(&self) -> &DispatchRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn stats(&self) -> &ExportStats {
        &self.stats
    }

    pub(crate) fn excludes_payload_fields(&self) -> bool {
        self.exclude_payload_fields
    }

    /// Wrap a graph object in a node
    pub fn node(&self, object: ObjectHandle) -> Result<Node> {
        Ok(Node::new(object, &self.classifier)?)
    }

    /// Descend from `root` through string keys to pick the export root
    pub fn traverse(&self, root: Node, segments: &[String]) -> Result<Node> {
        let mut current = root;
        let mut walked = Vec::new();

        for segment in segments {
            let parent = if walked.is_empty() {
                "/".to_string()
            } else {
                walked.join("/")
            };
            current = match current.child(&Key::from(segment.as_str()), &self.classifier)? {
                Some(Child::Node(child)) => child,
                Some(Child::Scalar(_)) => {
                    return Err(ExportError::TraversalNotObject {
                        segment: segment.clone(),
                        parent,
                    });
                }
                None => {
                    return Err(ExportError::TraversalNotFound {
                        segment: segment.clone(),
                        parent,
                    });
                }
            };
            walked.push(segment.as_str());
        }

        Ok(current)
    }

    /// Export `root` as a folder at `target`
    pub fn export(&self, root: Node, target: &ExportTarget) -> Result<ExportSummary> {
        info!(
            path = %target.content_path().display(),
            type_name = root.type_name(),
            "Starting export"
        );
        self.stats.reset();
        let target = target.clone().enter(root.identity(), self.max_depth)?;
        FolderHandler.export(self, root, &target)?;

        let summary = self.stats.snapshot();
        info!(
            directories = summary.directories_created,
            files = summary.files_written,
            bytes = summary.bytes_written,
            metadata = summary.metadata_written,
            removed = summary.metadata_removed,
            skipped = summary.nodes_skipped,
            "Export finished"
        );
        Ok(summary)
    }

    /// Dispatch every object child of `node`, in ascending key order
    pub fn walk(&self, node: &Node, target: &ExportTarget) -> Result<()> {
        for key in node.keys() {
            let Some(Child::Node(child)) = node.child(key, &self.classifier)? else {
                continue;
            };

            let handler = match self.registry.content(child.type_name()) {
                Some(Dispatch::Handle(handler)) => handler.clone(),
                Some(Dispatch::Skip) => {
                    debug!(key = %key, type_name = child.type_name(), "Skipping");
                    self.stats.node_skipped();
                    continue;
                }
                None => {
                    return Err(self.unknown_type(RegistryKind::Content, &child, key, target));
                }
            };

            let child_target = target.child(key)?.enter(child.identity(), self.max_depth)?;
            debug!(
                key = %key,
                type_name = child.type_name(),
                handler = handler.kind(),
                "Dispatching"
            );
            handler.export(self, child, &child_target)?;
        }
        Ok(())
    }

    /// Create the directory for a folder-like node if it does not exist yet
    pub fn create_dir(&self, target: &ExportTarget) -> Result<()> {
        let path = target.content_path();
        if path.is_dir() {
            return Ok(());
        }
        info!(path = %path.display(), "Creating directory");
        fs::create_dir(&path).map_err(|e| ExportError::io(&path, e))?;
        self.stats.directory_created();
        Ok(())
    }

    pub(crate) fn unknown_type(
        &self,
        registry: RegistryKind,
        node: &Node,
        key: &Key,
        target: &ExportTarget,
    ) -> ExportError {
        ExportError::UnknownType {
            registry,
            type_name: node.type_name().to_string(),
            key: key.to_string(),
            path: target.content_path(),
        }
    }
}
