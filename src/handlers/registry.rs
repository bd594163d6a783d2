use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;

use super::content::{DocumentHandler, FolderHandler, LargeFolderHandler, MetadataOnlyHandler};
use super::metadata::{
    MappingHandler, RawScalarHandler, SequenceHandler, TimestampHandler, TupleHandler,
};
use super::traits::{ContentHandler, MetadataHandler};

/// Registry entry: a handler, or an explicit instruction to leave the node out
pub enum Dispatch<H: ?Sized> {
    Skip,
    Handle(Arc<H>),
}

impl<H: ?Sized> Clone for Dispatch<H> {
    fn clone(&self) -> Self {
        match self {
            Dispatch::Skip => Dispatch::Skip,
            Dispatch::Handle(handler) => Dispatch::Handle(Arc::clone(handler)),
        }
    }
}

impl<H: ?Sized + fmt::Debug> fmt::Debug for Dispatch<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Skip => f.write_str("Skip"),
            Dispatch::Handle(handler) => f.debug_tuple("Handle").field(handler).finish(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Document types reference unknown payload profile '{0}'")]
    UnknownPayloadProfile(String),
}

/// Content and metadata dispatch tables keyed by canonical type name
///
/// A missing entry is not the same as [`Dispatch::Skip`]: callers treat a
/// miss as an unknown type and abort.
#[derive(Clone, Debug, Default)]
pub struct DispatchRegistry {
    content: BTreeMap<String, Dispatch<dyn ContentHandler>>,
    metadata: BTreeMap<String, Dispatch<dyn MetadataHandler>>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_content(
        &mut self,
        type_name: impl Into<String>,
        handler: Arc<dyn ContentHandler>,
    ) {
        self.content.insert(type_name.into(), Dispatch::Handle(handler));
    }

    pub fn skip_content(&mut self, type_name: impl Into<String>) {
        self.content.insert(type_name.into(), Dispatch::Skip);
    }

    pub fn register_metadata(
        &mut self,
        type_name: impl Into<String>,
        handler: Arc<dyn MetadataHandler>,
    ) {
        self.metadata.insert(type_name.into(), Dispatch::Handle(handler));
    }

    pub fn skip_metadata(&mut self, type_name: impl Into<String>) {
        self.metadata.insert(type_name.into(), Dispatch::Skip);
    }

    /// Skip `type_name` in both tables
    pub fn skip(&mut self, type_name: &str) {
        self.skip_content(type_name);
        self.skip_metadata(type_name);
    }

    pub fn content(&self, type_name: &str) -> Option<&Dispatch<dyn ContentHandler>> {
        self.content.get(type_name)
    }

    pub fn metadata(&self, type_name: &str) -> Option<&Dispatch<dyn MetadataHandler>> {
        self.metadata.get(type_name)
    }

    pub fn has_content(&self, type_name: &str) -> bool {
        self.content.contains_key(type_name)
    }

    pub fn has_metadata(&self, type_name: &str) -> bool {
        self.metadata.contains_key(type_name)
    }

    /// Build both tables from configuration
    ///
    /// The common skip list goes in first so explicit entries override it.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        for type_name in &config.common_skip {
            registry.skip(type_name);
        }

        let content = &config.content;
        for type_name in &content.skip {
            registry.skip_content(type_name.as_str());
        }
        registry.register_all_content(&content.folder, Arc::new(FolderHandler));
        registry.register_all_content(
            &content.large_folder,
            Arc::new(LargeFolderHandler::new(&config.export.shard_field)),
        );
        registry.register_all_content(&content.metadata_only, Arc::new(MetadataOnlyHandler));
        for (profile, type_names) in &content.documents {
            let rules = config
                .payloads
                .get(profile)
                .ok_or_else(|| RegistryError::UnknownPayloadProfile(profile.clone()))?;
            registry.register_all_content(
                type_names,
                Arc::new(DocumentHandler::new(profile, rules.clone())),
            );
        }

        let metadata = &config.metadata;
        for type_name in &metadata.skip {
            registry.skip_metadata(type_name.as_str());
        }
        registry.register_all_metadata(&metadata.mapping, Arc::new(MappingHandler));
        registry.register_all_metadata(&metadata.sequence, Arc::new(SequenceHandler));
        registry.register_all_metadata(&metadata.tuple, Arc::new(TupleHandler));
        registry.register_all_metadata(&metadata.raw_scalar, Arc::new(RawScalarHandler));
        registry.register_all_metadata(
            &metadata.timestamp,
            Arc::new(TimestampHandler::new(&config.export.timestamp_field)),
        );

        Ok(registry)
    }

    fn register_all_content(&mut self, type_names: &[String], handler: Arc<dyn ContentHandler>) {
        for type_name in type_names {
            self.register_content(type_name.as_str(), handler.clone());
        }
    }

    fn register_all_metadata(&mut self, type_names: &[String], handler: Arc<dyn MetadataHandler>) {
        for type_name in type_names {
            self.register_metadata(type_name.as_str(), handler.clone());
        }
    }
}
