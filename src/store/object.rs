use std::fmt;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;

use super::error::StoreError;
use super::records::{InlineRecord, StateRecord, ValueRecord};
use super::store::ObjectStore;
use crate::graph::{ClassInfo, GraphError, Key, LazyObject, ObjectId, ObjectState, Value};

/// Persistent object backed by an [`ObjectStore`]
///
/// Starts as a ghost. The class is read on first use, the state only on
/// [`LazyObject::materialize`]. Referenced objects become new ghosts, so
/// exporting a subtree never loads the rest of the store.
pub struct StoredObject {
    store: ObjectStore,
    oid: ObjectId,
    class: OnceLock<ClassInfo>,
    state: OnceLock<ObjectState>,
}

impl StoredObject {
    pub fn ghost(store: ObjectStore, oid: ObjectId) -> Self {
        Self {
            store,
            oid,
            class: OnceLock::new(),
            state: OnceLock::new(),
        }
    }

    pub fn is_ghost(&self) -> bool {
        self.state.get().is_none()
    }

    fn backend(&self, err: StoreError) -> GraphError {
        GraphError::Backend {
            id: Some(self.oid),
            source: Box::new(err),
        }
    }
}

impl fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredObject")
            .field("oid", &self.oid)
            .field("ghost", &self.is_ghost())
            .finish()
    }
}

impl LazyObject for StoredObject {
    fn class(&self) -> Result<ClassInfo, GraphError> {
        if let Some(class) = self.class.get() {
            return Ok(class.clone());
        }
        let class: ClassInfo = self
            .store
            .load_class(self.oid)
            .map_err(|e| self.backend(e))?
            .into();
        Ok(self.class.get_or_init(|| class).clone())
    }

    fn identity(&self) -> Option<ObjectId> {
        Some(self.oid)
    }

    fn materialize(&self) -> Result<(), GraphError> {
        if self.state.get().is_some() {
            return Ok(());
        }
        let record = self
            .store
            .load_state(self.oid)
            .map_err(|e| self.backend(e))?;
        let state = decode_state(&self.store, record);
        let _ = self.state.set(state);
        Ok(())
    }

    fn state(&self) -> Result<ObjectState, GraphError> {
        self.state
            .get()
            .cloned()
            .ok_or(GraphError::NotMaterialized(self.oid))
    }
}

/// Non-persistent object decoded together with its owner
#[derive(Debug)]
pub struct InlineObject {
    class: ClassInfo,
    state: ObjectState,
}

impl LazyObject for InlineObject {
    fn class(&self) -> Result<ClassInfo, GraphError> {
        Ok(self.class.clone())
    }

    fn identity(&self) -> Option<ObjectId> {
        None
    }

    fn materialize(&self) -> Result<(), GraphError> {
        Ok(())
    }

    fn state(&self) -> Result<ObjectState, GraphError> {
        Ok(self.state.clone())
    }
}

fn decode_state(store: &ObjectStore, record: StateRecord) -> ObjectState {
    match record {
        StateRecord::Mapping { entries } => ObjectState::Mapping(
            entries
                .into_iter()
                .map(|entry| (Key::from(entry.key), decode_value(store, entry.value)))
                .collect(),
        ),
        StateRecord::Sequence { items } => ObjectState::Sequence(
            items
                .into_iter()
                .map(|item| decode_value(store, item))
                .collect(),
        ),
        StateRecord::Broken { state } => {
            ObjectState::Broken(Box::new(decode_state(store, *state)))
        }
        StateRecord::Scalar { value } => ObjectState::Scalar(decode_value(store, value)),
        StateRecord::Opaque => ObjectState::Opaque,
    }
}

fn decode_value(store: &ObjectStore, record: ValueRecord) -> Value {
    match record {
        ValueRecord::None => Value::None,
        ValueRecord::Bool(b) => Value::Bool(b),
        ValueRecord::Int(i) => Value::Int(i),
        ValueRecord::Float(f) => Value::Float(f),
        ValueRecord::Text(s) => Value::Text(s),
        ValueRecord::Bytes(data) => Value::Bytes(Bytes::from(data)),
        ValueRecord::Ref(oid) => Value::Object(store.handle(oid)),
        ValueRecord::Inline(inline) => {
            let InlineRecord { class, state } = *inline;
            Value::Object(Arc::new(InlineObject {
                class: class.into(),
                state: decode_state(store, state),
            }))
        }
    }
}
