//! Serialized forms of graph objects
//!
//! These are both the values kept in the store partitions and the format of a
//! graph document accepted by `load`:
//!
//! ```json
//! {
//!     "root": 1,
//!     "objects": [
//!         {
//!             "oid": 1,
//!             "class": {"name": "OFS.Folder.Folder"},
//!             "state": {"kind": "mapping", "entries": [
//!                 {"key": "title", "value": {"text": "Site"}},
//!                 {"key": "front-page", "value": {"ref": 2}}
//!             ]}
//!         }
//!     ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::error::Result;
use crate::graph::{ClassInfo, Key, ObjectId};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
}

impl From<ClassRecord> for ClassInfo {
    fn from(record: ClassRecord) -> Self {
        ClassInfo::new(record.name).with_bases(record.bases)
    }
}

impl ClassRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateRecord {
    Mapping {
        #[serde(default)]
        entries: Vec<EntryRecord>,
    },
    Sequence {
        #[serde(default)]
        items: Vec<ValueRecord>,
    },
    Broken {
        state: Box<StateRecord>,
    },
    Scalar {
        value: ValueRecord,
    },
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntryRecord {
    pub key: KeyRecord,
    pub value: ValueRecord,
}

/// Integer keys are JSON numbers, string keys JSON strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum KeyRecord {
    Int(i64),
    Str(String),
}

impl From<KeyRecord> for Key {
    fn from(record: KeyRecord) -> Self {
        match record {
            KeyRecord::Int(i) => Key::Int(i),
            KeyRecord::Str(s) => Key::Str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRecord {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Another persistent object, loaded lazily
    Ref(ObjectId),
    /// A non-persistent object stored inside its owner
    Inline(Box<InlineRecord>),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InlineRecord {
    pub class: ClassRecord,
    pub state: StateRecord,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObjectRecord {
    pub oid: ObjectId,
    pub class: ClassRecord,
    pub state: StateRecord,
}

/// A whole graph: persistent objects plus the root id
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphDocument {
    pub root: ObjectId,
    pub objects: Vec<ObjectRecord>,
}

impl GraphDocument {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_from_json() {
        let doc: GraphDocument = serde_json::from_value(json!({
            "root": 1,
            "objects": [{
                "oid": 1,
                "class": {"name": "OFS.Folder.Folder", "bases": ["OFS.ObjectManager"]},
                "state": {"kind": "mapping", "entries": [
                    {"key": "title", "value": {"text": "Site"}},
                    {"key": 3, "value": {"int": 7}},
                    {"key": "page", "value": {"ref": 2}},
                    {"key": "none", "value": "none"},
                    {"key": "blob", "value": {"bytes": [255, 0]}}
                ]}
            }]
        }))
        .unwrap();

        assert_eq!(doc.root, 1);
        let StateRecord::Mapping { entries } = &doc.objects[0].state else {
            panic!("expected a mapping");
        };
        assert_eq!(entries[1].key, KeyRecord::Int(3));
        assert_eq!(entries[2].value, ValueRecord::Ref(2));
        assert_eq!(entries[3].value, ValueRecord::None);
        assert_eq!(entries[4].value, ValueRecord::Bytes(vec![255, 0]));
        assert_eq!(doc.objects[0].class.bases, vec!["OFS.ObjectManager".to_string()]);
    }

    #[test]
    fn test_nested_broken_and_inline() {
        let state: StateRecord = serde_json::from_value(json!({
            "kind": "broken",
            "state": {"kind": "mapping", "entries": [
                {"key": "when", "value": {"inline": {
                    "class": {"name": "builtin.tuple"},
                    "state": {"kind": "sequence", "items": [{"int": 1}, {"float": 2.5}]}
                }}}
            ]}
        }))
        .unwrap();

        let StateRecord::Broken { state } = state else {
            panic!("expected a broken state");
        };
        assert!(matches!(*state, StateRecord::Mapping { .. }));
    }

    #[test]
    fn test_class_record_into_class_info() {
        let class: ClassInfo = ClassRecord {
            name: "a.B".to_string(),
            bases: vec!["a.A".to_string()],
        }
        .into();
        assert_eq!(class.chain().collect::<Vec<_>>(), vec!["a.B", "a.A"]);
    }
}
