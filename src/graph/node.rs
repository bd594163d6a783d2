use std::collections::BTreeMap;
use tracing::warn;

use super::{
    Classification, Classifier, Family, GraphError, Key, ObjectHandle, ObjectId, ObjectState,
    Value,
};

/// Keyed view over one graph object
///
/// Construction materializes the object, classifies it and freezes its keys in
/// ascending order. Nodes are cheap to drop and are never cached across
/// siblings.
#[derive(Debug)]
pub struct Node {
    object: ObjectHandle,
    classification: Classification,
    entries: BTreeMap<Key, Value>,
    scalar: Option<Value>,
}

/// Result of looking up a key: primitives come back as-is, objects wrapped
#[derive(Debug)]
pub enum Child {
    Scalar(Value),
    Node(Node),
}

impl Node {
    pub fn new(object: ObjectHandle, classifier: &Classifier) -> Result<Self, GraphError> {
        let class = object.class()?;
        let classification = classifier.classify(&class);

        // Ghosts may report no keys until they are hydrated.
        object.materialize()?;
        let state = object.state()?;

        let (entries, scalar) = keyed_view(classification.family, state, &class.name);

        Ok(Self {
            object,
            classification,
            entries,
            scalar,
        })
    }

    /// Canonical type name used for dispatch
    pub fn type_name(&self) -> &str {
        &self.classification.type_name
    }

    pub fn identity(&self) -> Option<ObjectId> {
        self.object.identity()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value stored under `key`
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.entries.get(&Key::from(name))
    }

    /// Primitive carried by boxed-scalar objects
    pub fn scalar(&self) -> Option<&Value> {
        self.scalar.as_ref()
    }

    /// Look up `key`, wrapping object values in a fresh node
    pub fn child(&self, key: &Key, classifier: &Classifier) -> Result<Option<Child>, GraphError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::Object(obj)) => Ok(Some(Child::Node(Node::new(obj.clone(), classifier)?))),
            Some(value) => Ok(Some(Child::Scalar(value.clone()))),
        }
    }
}

fn keyed_view(
    family: Option<Family>,
    state: ObjectState,
    declared: &str,
) -> (BTreeMap<Key, Value>, Option<Value>) {
    let sorted = family.is_some_and(Family::is_sorted);

    match state {
        ObjectState::Mapping(entries) => (entries.into_iter().collect(), None),
        ObjectState::Sequence(mut items) => {
            if sorted {
                items.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
            }
            (index_mapping(items), None)
        }
        ObjectState::Broken(inner) => match *inner {
            ObjectState::Mapping(entries) => (entries.into_iter().collect(), None),
            _ => {
                warn!(type_name = declared, "Broken object state is not a mapping, exposing no keys");
                (BTreeMap::new(), None)
            }
        },
        ObjectState::Scalar(value) => (BTreeMap::new(), Some(value)),
        ObjectState::Opaque => (BTreeMap::new(), None),
    }
}

fn index_mapping(items: Vec<Value>) -> BTreeMap<Key, Value> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, value)| (Key::from(i), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::memory::MemoryObject;
    use crate::graph::{ClassInfo, ObjectState};

    fn classifier() -> Classifier {
        Classifier::new()
            .with_family(Family::SortedMap, ["BTrees.OOBTree.OOBTree"])
            .with_family(Family::SortedSet, ["BTrees.OOBTree.OOSet"])
    }

    fn keys(node: &Node) -> Vec<String> {
        node.keys().map(ToString::to_string).collect()
    }

    #[test]
    fn test_mapping_keys_are_sorted() {
        let obj = MemoryObject::mapping(
            "OFS.Folder.Folder",
            [("zeta", Value::Int(1)), ("alpha", Value::Int(2)), ("mid", Value::Int(3))],
        );
        let node = Node::new(obj, &classifier()).unwrap();
        assert_eq!(keys(&node), vec!["alpha", "mid", "zeta"]);
        assert_eq!(node.type_name(), "OFS.Folder.Folder");
    }

    #[test]
    fn test_duplicate_keys_collapse() {
        let obj = MemoryObject::mapping(
            "builtin.dict",
            [("a", Value::Int(1)), ("a", Value::Int(2))],
        );
        let node = Node::new(obj, &classifier()).unwrap();
        assert_eq!(node.len(), 1);
        assert!(matches!(node.field("a"), Some(Value::Int(2))));
    }

    #[test]
    fn test_sequence_becomes_index_mapping() {
        let items: Vec<Value> = (0..12).map(|i| Value::Int(100 + i)).collect();
        let obj = MemoryObject::sequence("builtin.list", items);
        let node = Node::new(obj, &classifier()).unwrap();

        let values: Vec<i64> = node
            .entries()
            .map(|(_, v)| match v {
                Value::Int(i) => *i,
                other => panic!("unexpected value {other:?}"),
            })
            .collect();
        assert_eq!(values, (100..112).collect::<Vec<_>>());
        assert_eq!(node.keys().last(), Some(&Key::Int(11)));
    }

    #[test]
    fn test_sorted_set_elements_are_sorted() {
        let obj = MemoryObject::sequence(
            "BTrees.OOBTree.OOSet",
            vec![Value::text("pear"), Value::text("apple"), Value::text("fig")],
        );
        let node = Node::new(obj, &classifier()).unwrap();
        assert!(matches!(node.get(&Key::Int(0)), Some(Value::Text(s)) if s == "apple"));
        assert!(matches!(node.get(&Key::Int(2)), Some(Value::Text(s)) if s == "pear"));
    }

    #[test]
    fn test_plain_sequence_keeps_source_order() {
        let obj = MemoryObject::sequence(
            "builtin.list",
            vec![Value::text("pear"), Value::text("apple")],
        );
        let node = Node::new(obj, &classifier()).unwrap();
        assert!(matches!(node.get(&Key::Int(0)), Some(Value::Text(s)) if s == "pear"));
    }

    #[test]
    fn test_sleepy_object_is_materialized_before_keys() {
        let obj = MemoryObject::new(
            ClassInfo::new("OFS.Folder.Folder"),
            ObjectState::Mapping(vec![(Key::from("doc"), Value::Int(1))]),
        )
        .sleepy()
        .into_handle();

        assert!(matches!(obj.state().unwrap(), ObjectState::Mapping(e) if e.is_empty()));
        let node = Node::new(obj, &classifier()).unwrap();
        assert_eq!(keys(&node), vec!["doc"]);
    }

    #[test]
    fn test_broken_mapping_state_is_exposed() {
        let obj = MemoryObject::new(
            ClassInfo::new("Products.Missing.Thing"),
            ObjectState::Broken(Box::new(ObjectState::Mapping(vec![(
                Key::from("title"),
                Value::text("Hello"),
            )]))),
        )
        .into_handle();
        let node = Node::new(obj, &classifier()).unwrap();
        assert_eq!(keys(&node), vec!["title"]);
    }

    #[test]
    fn test_broken_non_mapping_state_is_empty() {
        let obj = MemoryObject::new(
            ClassInfo::new("Products.Missing.Thing"),
            ObjectState::Broken(Box::new(ObjectState::Sequence(vec![Value::Int(1)]))),
        )
        .into_handle();
        let node = Node::new(obj, &classifier()).unwrap();
        assert!(node.is_empty());
    }

    #[test]
    fn test_scalar_state() {
        let obj = MemoryObject::new(
            ClassInfo::new("builtin.long"),
            ObjectState::Scalar(Value::Int(1 << 40)),
        )
        .into_handle();
        let node = Node::new(obj, &classifier()).unwrap();
        assert!(node.is_empty());
        assert!(matches!(node.scalar(), Some(Value::Int(v)) if *v == 1 << 40));
    }

    #[test]
    fn test_child_wraps_objects_only() {
        let inner = MemoryObject::mapping("builtin.dict", [("x", Value::Int(1))]);
        let obj = MemoryObject::mapping(
            "builtin.dict",
            [("inner", Value::Object(inner)), ("n", Value::Int(7))],
        );
        let node = Node::new(obj, &classifier()).unwrap();
        let c = classifier();

        assert!(matches!(
            node.child(&Key::from("n"), &c).unwrap(),
            Some(Child::Scalar(Value::Int(7)))
        ));
        match node.child(&Key::from("inner"), &c).unwrap() {
            Some(Child::Node(child)) => assert_eq!(child.type_name(), "builtin.dict"),
            other => panic!("expected node, got {other:?}"),
        }
        assert!(node.child(&Key::from("missing"), &c).unwrap().is_none());
    }
}
