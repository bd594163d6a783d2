use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ClassInfo, Value};

/// Canonical names of the primitive kinds
pub mod primitive {
    pub const NONE: &str = "builtin.none";
    pub const BOOL: &str = "builtin.bool";
    pub const INT: &str = "builtin.int";
    pub const FLOAT: &str = "builtin.float";
    pub const TEXT: &str = "builtin.text";
    pub const BYTES: &str = "builtin.bytes";
}

/// Family a registered type declares membership in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Ordered key/value containers (trees, buckets)
    SortedMap,
    /// Ordered key-only containers
    SortedSet,
    /// Externally materialized domain objects
    Persistent,
}

impl Family {
    pub fn is_sorted(self) -> bool {
        matches!(self, Family::SortedMap | Family::SortedSet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::SortedMap => "sorted_map",
            Family::SortedSet => "sorted_set",
            Family::Persistent => "persistent",
        }
    }
}

/// Result of classifying one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub type_name: String,
    pub family: Option<Family>,
}

/// Maps runtime types to the canonical names used as dispatch keys
///
/// Resolution order: primitives, then the nearest type in the declared chain
/// belonging to a sorted family, then the nearest persistent one, then the
/// declared type itself. Never fails.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    families: BTreeMap<String, Family>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, type_name: impl Into<String>, family: Family) {
        self.families.insert(type_name.into(), family);
    }

    pub fn with_family<I, S>(mut self, family: Family, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in type_names {
            self.declare(name, family);
        }
        self
    }

    pub fn family_of(&self, type_name: &str) -> Option<Family> {
        self.families.get(type_name).copied()
    }

    pub fn classify(&self, class: &ClassInfo) -> Classification {
        let nearest = |wanted: fn(Family) -> bool| {
            class.chain().find_map(|name| {
                self.family_of(name)
                    .filter(|family| wanted(*family))
                    .map(|family| (name, family))
            })
        };

        let found = nearest(Family::is_sorted).or_else(|| nearest(|f| f == Family::Persistent));

        match found {
            Some((name, family)) => Classification {
                type_name: name.to_string(),
                family: Some(family),
            },
            None => Classification {
                type_name: class.name.clone(),
                family: None,
            },
        }
    }

    /// Canonical name of a primitive value, `None` for object handles
    pub fn primitive_name(value: &Value) -> Option<&'static str> {
        match value {
            Value::None => Some(primitive::NONE),
            Value::Bool(_) => Some(primitive::BOOL),
            Value::Int(_) => Some(primitive::INT),
            Value::Float(_) => Some(primitive::FLOAT),
            Value::Text(_) => Some(primitive::TEXT),
            Value::Bytes(_) => Some(primitive::BYTES),
            Value::Object(_) => None,
        }
    }
}
