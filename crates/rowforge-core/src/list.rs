//! Record stores and the collections grids iterate over.
//!
//! The [`RecordStore`] owns the rows for one entity and is the only place that
//! assigns identities and timestamps. Grids never talk to the store directly;
//! they hold a [`RecordList`] — either a (possibly filtered) [`GridList`] view
//! over the store, or a [`ManyManyList`] that additionally tracks membership
//! and per-membership extra columns (the join-table data).

use crate::record::Record;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors from store and list operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with the given identity.
    #[error("record {0} not found")]
    NotFound(u64),
}

/// Owns the rows for one entity. Writes are atomic from the caller's point of
/// view; there is no transaction surface beyond single-record write/delete.
#[derive(Clone)]
pub struct RecordStore {
    entity: String,
    inner: Arc<RwLock<StoreInner>>,
}

struct StoreInner {
    rows: BTreeMap<u64, Record>,
    next_id: u64,
}

impl RecordStore {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            inner: Arc::new(RwLock::new(StoreInner {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Base entity this store holds. Variant kinds share their base store.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Persist the record: assigns an identity on first write, stamps
    /// timestamps, clears the change set.
    pub fn write(&self, record: &mut Record) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if record.id == 0 {
            record.id = inner.next_id;
            inner.next_id += 1;
        }
        record.mark_written(Utc::now());
        inner.rows.insert(record.id, record.clone());
        Ok(())
    }

    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }

    pub fn get(&self, id: u64) -> Option<Record> {
        self.inner.read().expect("store lock poisoned").rows.get(&id).cloned()
    }

    pub fn all(&self) -> Vec<Record> {
        self.inner
            .read()
            .expect("store lock poisoned")
            .rows
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("store lock poisoned").rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The collection a grid iterates over and detail forms write through.
pub trait RecordList: Send + Sync {
    /// Base entity of the records in this list.
    fn entity(&self) -> &str;

    /// Fetch a member record by identity. Filtered views return `None` for
    /// rows that exist in the store but fall outside the view.
    fn by_id(&self, id: u64) -> Option<Record>;

    /// Persist the record and make it a member of this list, with optional
    /// join-table extra data. Plain lists ignore `extra`.
    fn add(&self, record: &mut Record, extra: Option<&Map<String, Value>>)
        -> Result<(), StoreError>;

    /// Delete the record and drop its membership.
    fn remove(&self, id: u64) -> Result<(), StoreError>;

    /// All member records, in identity order.
    fn records(&self) -> Vec<Record>;

    /// Join-table extra data for a member, if this is a many-to-many list.
    fn extra_data(&self, _id: u64) -> Option<Map<String, Value>> {
        None
    }

    /// Whether this list is backed by a many-to-many relation.
    fn is_many_many(&self) -> bool {
        false
    }

    fn contains(&self, id: u64) -> bool {
        self.by_id(id).is_some()
    }
}

/// Predicate narrowing a grid to a subset of the store.
///
/// A record that stops matching after a save silently drops out of the list;
/// the detail form notices and sends the user back to the grid.
#[derive(Debug, Clone)]
pub struct ListFilter {
    pub field: String,
    pub equals: Value,
}

impl ListFilter {
    pub fn new(field: impl Into<String>, equals: Value) -> Self {
        Self {
            field: field.into(),
            equals,
        }
    }

    fn matches(&self, record: &Record) -> bool {
        record.get(&self.field) == Some(&self.equals)
    }
}

/// A (possibly filtered) view over a [`RecordStore`].
#[derive(Clone)]
pub struct GridList {
    store: RecordStore,
    filter: Option<ListFilter>,
}

impl GridList {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            filter: None,
        }
    }

    pub fn filtered(store: RecordStore, filter: ListFilter) -> Self {
        Self {
            store,
            filter: Some(filter),
        }
    }
}

impl RecordList for GridList {
    fn entity(&self) -> &str {
        self.store.entity()
    }

    fn by_id(&self, id: u64) -> Option<Record> {
        let record = self.store.get(id)?;
        match &self.filter {
            Some(filter) if !filter.matches(&record) => None,
            _ => Some(record),
        }
    }

    fn add(
        &self,
        record: &mut Record,
        _extra: Option<&Map<String, Value>>,
    ) -> Result<(), StoreError> {
        self.store.write(record)
    }

    fn remove(&self, id: u64) -> Result<(), StoreError> {
        self.store.delete(id)
    }

    fn records(&self) -> Vec<Record> {
        self.store
            .all()
            .into_iter()
            .filter(|r| self.filter.as_ref().is_none_or(|f| f.matches(r)))
            .collect()
    }
}

/// A many-to-many relation: membership plus join-table extra columns.
#[derive(Clone)]
pub struct ManyManyList {
    store: RecordStore,
    members: Arc<RwLock<HashSet<u64>>>,
    extra: Arc<RwLock<HashMap<u64, Map<String, Value>>>>,
}

impl ManyManyList {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            members: Arc::new(RwLock::new(HashSet::new())),
            extra: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl RecordList for ManyManyList {
    fn entity(&self) -> &str {
        self.store.entity()
    }

    fn by_id(&self, id: u64) -> Option<Record> {
        if !self.members.read().expect("members lock poisoned").contains(&id) {
            return None;
        }
        self.store.get(id)
    }

    fn add(
        &self,
        record: &mut Record,
        extra: Option<&Map<String, Value>>,
    ) -> Result<(), StoreError> {
        self.store.write(record)?;
        self.members
            .write()
            .expect("members lock poisoned")
            .insert(record.id);
        if let Some(extra) = extra {
            self.extra
                .write()
                .expect("extra lock poisoned")
                .insert(record.id, extra.clone());
        }
        Ok(())
    }

    fn remove(&self, id: u64) -> Result<(), StoreError> {
        self.members.write().expect("members lock poisoned").remove(&id);
        self.extra.write().expect("extra lock poisoned").remove(&id);
        self.store.delete(id)
    }

    fn extra_data(&self, id: u64) -> Option<Map<String, Value>> {
        self.extra.read().expect("extra lock poisoned").get(&id).cloned()
    }

    fn is_many_many(&self) -> bool {
        true
    }

    fn records(&self) -> Vec<Record> {
        let members = self.members.read().expect("members lock poisoned");
        self.store
            .all()
            .into_iter()
            .filter(|r| members.contains(&r.id))
            .collect()
    }
}
