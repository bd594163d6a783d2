use std::path::PathBuf;
use thiserror::Error;

use crate::graph::ObjectId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Object not found: 0x{0:016x}")]
    ObjectNotFound(ObjectId),

    #[error("Store has no root object")]
    MissingRoot,

    #[error("Invalid key format: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
