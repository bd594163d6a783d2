use serde_json::Value as JsonValue;

use crate::export::{ExportError, ExportTarget, Exporter, Result, scalar_to_json};
use crate::graph::Node;

use super::traits::MetadataHandler;

/// Nested mapping
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingHandler;

impl MetadataHandler for MappingHandler {
    fn kind(&self) -> &'static str {
        "mapping"
    }

    fn extract(&self, exporter: &Exporter, node: &Node, target: &ExportTarget) -> Result<JsonValue> {
        Ok(JsonValue::Object(exporter.extract_metadata(node, target)?))
    }
}

/// Index mapping re-emitted as an array, in ascending key order
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceHandler;

impl MetadataHandler for SequenceHandler {
    fn kind(&self) -> &'static str {
        "sequence"
    }

    fn extract(&self, exporter: &Exporter, node: &Node, target: &ExportTarget) -> Result<JsonValue> {
        Ok(JsonValue::Array(exporter.extract_values(node, target)?))
    }
}

/// Fixed-length sequence; JSON has no tuple type so it is emitted as an array
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleHandler;

impl MetadataHandler for TupleHandler {
    fn kind(&self) -> &'static str {
        "tuple"
    }

    fn extract(&self, exporter: &Exporter, node: &Node, target: &ExportTarget) -> Result<JsonValue> {
        Ok(JsonValue::Array(exporter.extract_values(node, target)?))
    }
}

/// Boxed primitive returned unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawScalarHandler;

impl MetadataHandler for RawScalarHandler {
    fn kind(&self) -> &'static str {
        "raw_scalar"
    }

    fn extract(&self, _exporter: &Exporter, node: &Node, target: &ExportTarget) -> Result<JsonValue> {
        node.scalar()
            .and_then(|value| scalar_to_json(value, target.name()))
            .ok_or_else(|| ExportError::UnexpectedShape {
                type_name: node.type_name().to_string(),
                expected: "a boxed scalar",
                path: target.content_path(),
            })
    }
}

/// Encoded time value taken verbatim from an internal field
#[derive(Debug, Clone)]
pub struct TimestampHandler {
    field: String,
}

impl TimestampHandler {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl MetadataHandler for TimestampHandler {
    fn kind(&self) -> &'static str {
        "timestamp"
    }

    fn extract(&self, _exporter: &Exporter, node: &Node, target: &ExportTarget) -> Result<JsonValue> {
        let value = node.field(&self.field).ok_or_else(|| ExportError::MissingField {
            type_name: node.type_name().to_string(),
            field: self.field.clone(),
            path: target.content_path(),
        })?;
        scalar_to_json(value, &self.field).ok_or_else(|| ExportError::UnexpectedShape {
            type_name: node.type_name().to_string(),
            expected: "a scalar time value",
            path: target.content_path(),
        })
    }
}
