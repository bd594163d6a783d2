//! Object graph abstraction consumed by the exporter
//!
//! The exporter never talks to a storage engine directly. It sees every graph
//! object through the [`LazyObject`] capability and wraps it in a [`Node`], which
//! exposes a uniform, sorted, keyed view regardless of how the object is laid
//! out (mapping, sequence, sorted container, broken state).
//!
//! ## Key Components
//!
//! - [`LazyObject`] - capability implemented by storage backends
//! - [`Node`] - keyed view over one materialized object
//! - [`Classifier`] - resolves canonical type names used for dispatch
//! - [`memory`] - in-memory backend for fixtures and tests

mod classify;
pub mod memory;
mod node;
mod value;

pub use classify::{Classification, Classifier, Family, primitive};
pub use node::{Child, Node};
pub use value::{Key, Value};

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Identity of a persistent object inside its store
pub type ObjectId = u64;

/// Shared handle to a graph object
pub type ObjectHandle = Arc<dyn LazyObject>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("object {0} was read before it was materialized")]
    NotMaterialized(ObjectId),

    #[error("failed to load object {}: {source}", display_id(.id))]
    Backend {
        id: Option<ObjectId>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn display_id(id: &Option<ObjectId>) -> String {
    id.map(|id| format!("0x{id:016x}"))
        .unwrap_or_else(|| "<inline>".to_string())
}

/// Declared type of an object plus its ancestor chain (nearest first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: String,
    pub bases: Vec<String>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
        }
    }

    pub fn with_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    /// Declared type followed by its ancestors
    pub fn chain(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.bases.iter().map(String::as_str))
    }
}

/// Shape of a materialized object
#[derive(Debug, Clone)]
pub enum ObjectState {
    Mapping(Vec<(Key, Value)>),
    Sequence(Vec<Value>),
    /// Fallback state of an object whose class could not be loaded
    Broken(Box<ObjectState>),
    /// Boxed primitive, e.g. an integer too large for a native scalar
    Scalar(Value),
    Opaque,
}

/// Capability every graph backend implements
///
/// Objects may start out as ghosts. [`LazyObject::materialize`] must be called
/// before [`LazyObject::state`] is trusted; some backends report an empty state
/// (or fail) until then.
pub trait LazyObject: fmt::Debug + Send + Sync {
    /// Type information, available without materializing the state
    fn class(&self) -> Result<ClassInfo, GraphError>;

    /// Identity for persistent objects, `None` for inline ones
    fn identity(&self) -> Option<ObjectId>;

    /// Fully hydrate the object. Idempotent.
    fn materialize(&self) -> Result<(), GraphError>;

    fn state(&self) -> Result<ObjectState, GraphError>;
}
