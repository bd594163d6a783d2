use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::graph::{GraphError, ObjectId};

/// Which dispatch table a lookup went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Content,
    Metadata,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Content => f.write_str("content"),
            RegistryKind::Metadata => f.write_str("metadata"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown {registry} type '{type_name}' for '{key}' in '{}'", .path.display())]
    UnknownType {
        registry: RegistryKind,
        type_name: String,
        key: String,
        path: PathBuf,
    },

    #[error("No payload field found on '{type_name}' at '{}' (available keys: {available})", .path.display())]
    UnhandledPayloadShape {
        type_name: String,
        path: PathBuf,
        available: String,
    },

    #[error("'{type_name}' at '{}' has no '{field}' field", .path.display())]
    MissingField {
        type_name: String,
        field: String,
        path: PathBuf,
    },

    #[error("'{type_name}' at '{}' is not {expected}", .path.display())]
    UnexpectedShape {
        type_name: String,
        expected: &'static str,
        path: PathBuf,
    },

    #[error("Cycle detected at '{}': object 0x{id:016x} is already being exported", .path.display())]
    Cycle { id: ObjectId, path: PathBuf },

    #[error("Maximum nesting depth {limit} exceeded at '{}'", .path.display())]
    DepthExceeded { limit: usize, path: PathBuf },

    #[error("Key '{name}' in '{}' cannot be used as a file name", .path.display())]
    InvalidName { name: String, path: PathBuf },

    #[error("Traversal segment '{segment}' not found under '{parent}'")]
    TraversalNotFound { segment: String, parent: String },

    #[error("Traversal segment '{segment}' under '{parent}' is not an object")]
    TraversalNotObject { segment: String, parent: String },

    #[error("Destination '{}' has no final path component", .0.display())]
    InvalidDestination(PathBuf),

    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
