use serde::{Deserialize, Serialize};

use crate::export::{ExportError, ExportTarget, Payload, Result};
use crate::graph::{Child, Classifier, Key, Node, Value};

/// One candidate location of a document's payload
///
/// The rule applies when the `when` path exists on the node (or the `read`
/// path, if `when` is empty). Later path segments are looked up inside the
/// object reached by the previous segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PayloadRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<String>,
    pub read: Vec<String>,
}

impl PayloadRule {
    pub fn read<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            when: Vec::new(),
            read: path.into_iter().map(Into::into).collect(),
        }
    }

    pub fn when<I, S>(mut self, guard: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.when = guard.into_iter().map(Into::into).collect();
        self
    }

    fn guard(&self) -> &[String] {
        if self.when.is_empty() {
            &self.read
        } else {
            &self.when
        }
    }

    /// Top-level field that directly holds the payload
    pub fn source_field(&self) -> Option<Key> {
        match self.read.as_slice() {
            [field] => Some(Key::from(field.as_str())),
            _ => None,
        }
    }
}

/// Payload located on a node, plus the field it came from
#[derive(Debug)]
pub struct ResolvedPayload {
    pub payload: Payload,
    pub source_field: Option<Key>,
}

/// Try `rules` in order and return the first payload found
pub fn resolve(
    rules: &[PayloadRule],
    node: &Node,
    classifier: &Classifier,
    target: &ExportTarget,
) -> Result<ResolvedPayload> {
    for rule in rules {
        if lookup(node, rule.guard(), classifier)?.is_none() {
            continue;
        }

        let value = lookup(node, &rule.read, classifier)?.ok_or_else(|| {
            ExportError::MissingField {
                type_name: node.type_name().to_string(),
                field: rule.read.join("."),
                path: target.content_path(),
            }
        })?;

        let payload = match value {
            Value::Bytes(data) => Payload::Bytes(data),
            Value::Text(text) => Payload::Text(text),
            Value::Object(obj) => Payload::Chain(Node::new(obj, classifier)?),
            _ => {
                return Err(ExportError::UnexpectedShape {
                    type_name: node.type_name().to_string(),
                    expected: "a bytes, text or chunk-chain payload",
                    path: target.content_path(),
                });
            }
        };

        return Ok(ResolvedPayload {
            payload,
            source_field: rule.source_field(),
        });
    }

    Err(ExportError::UnhandledPayloadShape {
        type_name: node.type_name().to_string(),
        path: target.content_path(),
        available: node
            .keys()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

fn lookup(node: &Node, path: &[String], classifier: &Classifier) -> Result<Option<Value>> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(None);
    };
    if rest.is_empty() {
        return Ok(node.field(first).cloned());
    }
    match node.child(&Key::from(first.as_str()), classifier)? {
        Some(Child::Node(child)) => lookup(&child, rest, classifier),
        _ => Ok(None),
    }
}
