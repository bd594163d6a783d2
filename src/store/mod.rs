/// Fjall-based persistent object store
///
/// Holds a graph of persistent objects that the exporter reads lazily:
///
/// - Class records (declared type name and ancestor chain)
/// - State records (mapping, sequence, broken, boxed scalar or opaque)
/// - The root object id
///
/// Objects handed to the exporter are ghosts ([`StoredObject`]); their state is
/// read from the store when the exporter materializes them. Export only reads.
///
/// ## Usage
///
/// ```rust,ignore
/// use graphdump::store::{GraphDocument, ObjectStore};
///
/// let store = ObjectStore::open("data/site")?;
/// store.import(&GraphDocument::from_path("site.json")?)?;
/// let root = store.root()?;
/// ```

pub mod error;
pub mod object;
pub mod partitions;
pub mod records;
pub mod store;

pub use error::{Result, StoreError};
pub use object::{InlineObject, StoredObject};
pub use records::{
    ClassRecord, EntryRecord, GraphDocument, InlineRecord, KeyRecord, ObjectRecord, StateRecord,
    ValueRecord,
};
pub use store::ObjectStore;
