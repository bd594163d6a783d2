use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value as JsonValue};
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, info};

use super::error::{ExportError, RegistryKind, Result};
use super::target::ExportTarget;
use super::walker::Exporter;
use crate::graph::{Child, Key, Node, Value};
use crate::handlers::Dispatch;

const JSON_INDENT: &[u8] = b"    ";

impl Exporter {
    /// Convert a node's fields into a JSON object
    pub fn extract_metadata(&self, node: &Node, target: &ExportTarget) -> Result<Map<String, JsonValue>> {
        let fields = self.extract_fields(node, target, None)?;
        Ok(into_object(fields))
    }

    /// Field values in ascending key order, keys dropped
    pub fn extract_values(&self, node: &Node, target: &ExportTarget) -> Result<Vec<JsonValue>> {
        let fields = self.extract_fields(node, target, None)?;
        Ok(fields.into_iter().map(|(_, value)| value).collect())
    }

    /// Write `target`'s sidecar, or remove a stale one when there is nothing to say
    pub fn write_metadata(&self, node: &Node, target: &ExportTarget, exclude: Option<&Key>) -> Result<()> {
        let fields = self.extract_fields(node, target, exclude)?;
        let path = target.metadata_path();

        if fields.is_empty() {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!(path = %path.display(), "Removing stale metadata");
                    self.stats().metadata_removed();
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(ExportError::io(&path, e)),
            }
            return Ok(());
        }

        info!(path = %path.display(), "Writing metadata");
        let json = to_pretty_json(&JsonValue::Object(into_object(fields)))?;
        fs::write(&path, json).map_err(|e| ExportError::io(&path, e))?;
        self.stats().metadata_written();
        Ok(())
    }

    fn extract_fields(
        &self,
        node: &Node,
        target: &ExportTarget,
        exclude: Option<&Key>,
    ) -> Result<Vec<(Key, JsonValue)>> {
        let mut fields = Vec::with_capacity(node.len());
        for key in node.keys() {
            if exclude == Some(key) {
                continue;
            }
            let json = match node.child(key, self.classifier())? {
                Some(Child::Node(child)) => self.extract_child(&child, key, target)?,
                Some(Child::Scalar(scalar)) => {
                    scalar_to_json(&scalar, &key.to_string()).unwrap_or(JsonValue::Null)
                }
                None => continue,
            };
            fields.push((key.clone(), json));
        }
        Ok(fields)
    }

    fn extract_child(&self, child: &Node, key: &Key, target: &ExportTarget) -> Result<JsonValue> {
        match self.registry().metadata(child.type_name()) {
            Some(Dispatch::Handle(handler)) => {
                let nested = target.nested(key).enter(child.identity(), self.max_depth())?;
                handler.extract(self, child, &nested)
            }
            Some(Dispatch::Skip) => Ok(JsonValue::String(format!("<{}>", child.type_name()))),
            None => Err(self.unknown_type(RegistryKind::Metadata, child, key, target)),
        }
    }
}

/// JSON form of a primitive value, `None` for object handles
///
/// Byte strings are decoded as UTF-8; undecodable ones become a placeholder
/// recording their length instead of failing the export.
pub fn scalar_to_json(value: &Value, key: &str) -> Option<JsonValue> {
    let json = match value {
        Value::None => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Bytes(data) => match std::str::from_utf8(data) {
            Ok(s) => JsonValue::String(s.to_string()),
            Err(_) => {
                debug!(key, len = data.len(), "Replacing undecodable text");
                JsonValue::String(binary_placeholder(data.len()))
            }
        },
        Value::Object(_) => return None,
    };
    Some(json)
}

/// Stand-in for a byte string that is not valid UTF-8
pub fn binary_placeholder(len: usize) -> String {
    format!("<binary data of {len} bytes>")
}

/// Integer and string keys with the same text share one JSON key; the
/// string key sorts later and wins.
fn into_object(fields: Vec<(Key, JsonValue)>) -> Map<String, JsonValue> {
    let mut object = Map::with_capacity(fields.len());
    for (key, value) in fields {
        let name = key.to_string();
        if object.insert(name, value).is_some() {
            debug!(key = %key, "Key collides with an earlier field, overwriting");
        }
    }
    object
}

fn to_pretty_json(value: &JsonValue) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut serializer)?;
    Ok(out)
}
