//! In-memory graph backend
//!
//! Used to build fixtures without a store on disk. Objects get a process-wide
//! unique identity so cycle detection works exactly as it does for stored
//! objects.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{ClassInfo, GraphError, Key, LazyObject, ObjectHandle, ObjectId, ObjectState, Value};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub struct MemoryObject {
    id: ObjectId,
    class: ClassInfo,
    state: Mutex<ObjectState>,
    awake: AtomicBool,
}

impl MemoryObject {
    pub fn new(class: ClassInfo, state: ObjectState) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            class,
            state: Mutex::new(state),
            awake: AtomicBool::new(true),
        }
    }

    /// Report an empty state until materialized, like a storage ghost
    pub fn sleepy(self) -> Self {
        self.awake.store(false, Ordering::Relaxed);
        self
    }

    pub fn into_handle(self) -> ObjectHandle {
        Arc::new(self)
    }

    pub fn mapping<I, K>(type_name: &str, entries: I) -> ObjectHandle
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<Key>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::new(ClassInfo::new(type_name), ObjectState::Mapping(entries)).into_handle()
    }

    pub fn sequence(type_name: &str, items: Vec<Value>) -> ObjectHandle {
        Self::new(ClassInfo::new(type_name), ObjectState::Sequence(items)).into_handle()
    }

    /// Swap the state after construction, e.g. to tie a cycle
    pub fn replace_state(&self, state: ObjectState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn is_awake(&self) -> bool {
        self.awake.load(Ordering::Relaxed)
    }
}

impl LazyObject for MemoryObject {
    fn class(&self) -> Result<ClassInfo, GraphError> {
        Ok(self.class.clone())
    }

    fn identity(&self) -> Option<ObjectId> {
        Some(self.id)
    }

    fn materialize(&self) -> Result<(), GraphError> {
        self.awake.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn state(&self) -> Result<ObjectState, GraphError> {
        if !self.is_awake() {
            return Ok(ObjectState::Mapping(Vec::new()));
        }
        Ok(self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
