//! Handler system for graphdump
//!
//! Every canonical type name the exporter meets is dispatched through two
//! tables: the content table decides what a node becomes on disk, the metadata
//! table decides how a node nested inside another node's fields is rendered
//! into JSON.
//!
//! ## Key Components
//!
//! - [`ContentHandler`] / [`MetadataHandler`] - handler capabilities
//! - [`DispatchRegistry`] - tables mapping type names to handlers or skip
//! - [`PayloadRule`] - ordered payload locations for document types
//!
//! ## Example
//!
//! ```rust,ignore
//! use graphdump::handlers::{DispatchRegistry, FolderHandler};
//!
//! let mut registry = DispatchRegistry::new();
//! registry.register_content("OFS.Folder.Folder", Arc::new(FolderHandler));
//! registry.skip("Products.CMFPlone.CatalogTool.CatalogTool");
//! ```

mod content;
mod metadata;
pub mod payload;
mod registry;
mod traits;

pub use content::{DocumentHandler, FolderHandler, LargeFolderHandler, MetadataOnlyHandler};
pub use metadata::{
    MappingHandler, RawScalarHandler, SequenceHandler, TimestampHandler, TupleHandler,
};
pub use payload::{PayloadRule, ResolvedPayload};
pub use registry::{Dispatch, DispatchRegistry, RegistryError};
pub use traits::{ContentHandler, MetadataHandler};
