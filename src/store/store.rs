use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use tracing::{debug, info};

use super::error::{Result, StoreError};
use super::object::StoredObject;
use super::partitions::{CLASSES, META, ROOT_KEY, STATES, decode_oid_key, encode_oid_key};
use super::records::{ClassRecord, GraphDocument, ObjectRecord, StateRecord};
use crate::graph::{ObjectHandle, ObjectId};

/// Fjall-backed persistent object store
#[derive(Clone)]
pub struct ObjectStore {
    path: PathBuf,
    keyspace: Keyspace,
    classes: PartitionHandle,
    states: PartitionHandle,
    meta: PartitionHandle,
}

impl fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ObjectStore {
    /// Open or create a Fjall store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening object store at: {}", path.display());

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;

        let classes = keyspace.open_partition(CLASSES, PartitionCreateOptions::default())?;
        let states = keyspace.open_partition(STATES, PartitionCreateOptions::default())?;
        let meta = keyspace.open_partition(META, PartitionCreateOptions::default())?;

        debug!("Object store opened");
        Ok(Self {
            path: path.to_path_buf(),
            keyspace,
            classes,
            states,
            meta,
        })
    }

    /// Open a store that must already exist
    ///
    /// Fjall has no read-only mode: opening may still replay its journal and
    /// write recovery state under `path`. Callers that only export never issue
    /// writes through this handle.
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store or replace one persistent object
    pub fn put(&self, record: &ObjectRecord) -> Result<()> {
        let key = encode_oid_key(record.oid);
        self.classes.insert(key.as_slice(), serde_json::to_vec(&record.class)?)?;
        self.states.insert(key.as_slice(), serde_json::to_vec(&record.state)?)?;
        debug!(oid = record.oid, class = %record.class.name, "Stored object");
        Ok(())
    }

    pub fn set_root(&self, oid: ObjectId) -> Result<()> {
        self.meta.insert(ROOT_KEY, encode_oid_key(oid).as_slice())?;
        Ok(())
    }

    pub fn root_id(&self) -> Result<ObjectId> {
        let value = self.meta.get(ROOT_KEY)?.ok_or(StoreError::MissingRoot)?;
        decode_oid_key(&value).ok_or_else(|| StoreError::InvalidKey("root".to_string()))
    }

    /// Ghost handle for the root object
    pub fn root(&self) -> Result<ObjectHandle> {
        let oid = self.root_id()?;
        Ok(self.handle(oid))
    }

    /// Ghost handle for `oid`; nothing is read until the exporter asks
    pub fn handle(&self, oid: ObjectId) -> ObjectHandle {
        Arc::new(StoredObject::ghost(self.clone(), oid))
    }

    pub fn contains(&self, oid: ObjectId) -> Result<bool> {
        Ok(self.classes.contains_key(encode_oid_key(oid))?)
    }

    pub fn load_class(&self, oid: ObjectId) -> Result<ClassRecord> {
        let value = self
            .classes
            .get(encode_oid_key(oid))?
            .ok_or(StoreError::ObjectNotFound(oid))?;
        Ok(serde_json::from_slice(&value)?)
    }

    pub fn load_state(&self, oid: ObjectId) -> Result<StateRecord> {
        let value = self
            .states
            .get(encode_oid_key(oid))?
            .ok_or(StoreError::ObjectNotFound(oid))?;
        Ok(serde_json::from_slice(&value)?)
    }

    /// Load a whole graph document and persist it
    ///
    /// The root must be one of the document's objects.
    pub fn import(&self, document: &GraphDocument) -> Result<usize> {
        if !document.objects.iter().any(|o| o.oid == document.root) {
            return Err(StoreError::ObjectNotFound(document.root));
        }

        for record in &document.objects {
            self.put(record)?;
        }
        self.set_root(document.root)?;
        self.persist()?;

        info!(
            objects = document.objects.len(),
            root = document.root,
            "Imported graph document"
        );
        Ok(document.objects.len())
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::records::{EntryRecord, KeyRecord, ValueRecord};
    use tempfile::TempDir;

    fn create_test_store() -> (ObjectStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ObjectStore::open(temp_dir.path().join("test_store")).unwrap();
        (store, temp_dir)
    }

    fn create_test_record(oid: ObjectId) -> ObjectRecord {
        ObjectRecord {
            oid,
            class: ClassRecord::new("OFS.Folder.Folder"),
            state: StateRecord::Mapping {
                entries: vec![EntryRecord {
                    key: KeyRecord::Str("title".to_string()),
                    value: ValueRecord::Text("Site".to_string()),
                }],
            },
        }
    }

    #[test]
    fn test_open_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = ObjectStore::open(temp_dir.path().join("test_store"));
        assert!(store.is_ok());
    }

    #[test]
    fn test_open_existing_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = ObjectStore::open_existing(temp_dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_put_and_load() {
        let (store, _temp) = create_test_store();
        let record = create_test_record(7);

        store.put(&record).unwrap();

        assert!(store.contains(7).unwrap());
        assert_eq!(store.load_class(7).unwrap(), record.class);
        assert_eq!(store.load_state(7).unwrap(), record.state);
    }

    #[test]
    fn test_missing_object() {
        let (store, _temp) = create_test_store();
        assert!(matches!(
            store.load_class(42),
            Err(StoreError::ObjectNotFound(42))
        ));
    }

    #[test]
    fn test_missing_root() {
        let (store, _temp) = create_test_store();
        assert!(matches!(store.root_id(), Err(StoreError::MissingRoot)));
    }

    #[test]
    fn test_import_sets_root() {
        let (store, _temp) = create_test_store();
        let document = GraphDocument {
            root: 1,
            objects: vec![create_test_record(1), create_test_record(2)],
        };

        assert_eq!(store.import(&document).unwrap(), 2);
        assert_eq!(store.root_id().unwrap(), 1);

        assert!(store.contains(1).unwrap());
        assert!(store.contains(2).unwrap());
        assert!(!store.contains(3).unwrap());
    }

    #[test]
    fn test_import_rejects_unknown_root() {
        let (store, _temp) = create_test_store();
        let document = GraphDocument {
            root: 9,
            objects: vec![create_test_record(1)],
        };

        assert!(matches!(
            store.import(&document),
            Err(StoreError::ObjectNotFound(9))
        ));
    }

    #[test]
    fn test_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test_store");
        {
            let store = ObjectStore::open(&path).unwrap();
            store
                .import(&GraphDocument {
                    root: 3,
                    objects: vec![create_test_record(3)],
                })
                .unwrap();
        }

        let store = ObjectStore::open_existing(&path).unwrap();
        assert_eq!(store.root_id().unwrap(), 3);
        assert_eq!(store.load_class(3).unwrap().name, "OFS.Folder.Folder");
    }
}
