//! Tree walker, metadata extractor and content writer
//!
//! An [`Exporter`] turns a [`Node`](crate::graph::Node) into a directory tree:
//! folder-like nodes become directories, content nodes become payload files,
//! and any node may get a sidecar `<name>.json` holding its remaining fields.
//!
//! ## Output layout
//!
//! ```text
//! base/site/            folder `site`
//! base/site.json        metadata of `site` (only when non-empty)
//! base/site/front-page  payload of a content node
//! base/site/front-page.json
//! ```
//!
//! The walk is depth-first and visits children in ascending key order, so two
//! runs over the same graph produce identical trees. Any unknown type aborts
//! the run; files written before the failure are left in place.

mod error;
mod metadata;
mod target;
mod walker;
mod writer;

pub use error::{ExportError, RegistryKind, Result};
pub use metadata::{binary_placeholder, scalar_to_json};
pub use target::ExportTarget;
pub use walker::{DEFAULT_MAX_DEPTH, Exporter};
pub use writer::Payload;
