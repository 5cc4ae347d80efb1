//! In-memory aggregate store
//!
//! Keeps records in a `BTreeMap` behind a `RwLock`. Used for the `memory`
//! storage backend and as the default test double.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::Serialize;
use tracing::debug;

use crate::error::{WalletError, WalletResult};

use super::{AggregateData, AggregateStore, BatchAggregateStore, Criteria, QueryAggregateStore};

/// Store that lives only as long as the process
pub struct InMemoryStore<D> {
    name: &'static str,
    data: RwLock<BTreeMap<String, D>>,
}

impl<D: AggregateData> InMemoryStore<D> {
    /// Create an empty store; `name` is used in log and error messages
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of records held
    pub fn len(&self) -> WalletResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> WalletResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> WalletResult<std::sync::RwLockReadGuard<'_, BTreeMap<String, D>>> {
        self.data.read().map_err(|e| {
            WalletError::Storage(format!("{}: failed to acquire read lock: {}", self.name, e))
        })
    }

    fn write(&self) -> WalletResult<std::sync::RwLockWriteGuard<'_, BTreeMap<String, D>>> {
        self.data.write().map_err(|e| {
            WalletError::Storage(format!("{}: failed to acquire write lock: {}", self.name, e))
        })
    }
}

impl<D: AggregateData> AggregateStore<D> for InMemoryStore<D> {
    fn save(&self, data: &D) -> WalletResult<()> {
        self.write()?.insert(data.id().to_string(), data.clone());
        debug!(store = self.name, id = data.id(), "saved record");
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> WalletResult<Option<D>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn delete(&self, id: &str) -> WalletResult<()> {
        if self.write()?.remove(id).is_some() {
            debug!(store = self.name, id, "deleted record");
        }
        Ok(())
    }
}

impl<D: AggregateData> BatchAggregateStore<D> for InMemoryStore<D> {
    fn save_batch(&self, items: &[D]) -> WalletResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        let mut data = self.write()?;
        for item in items {
            data.insert(item.id().to_string(), item.clone());
        }
        debug!(store = self.name, count = items.len(), "saved batch");
        Ok(())
    }

    fn find_batch(&self, ids: &[&str]) -> WalletResult<Vec<D>> {
        let data = self.read()?;
        Ok(ids.iter().filter_map(|id| data.get(*id).cloned()).collect())
    }
}

impl<D: AggregateData + Serialize> QueryAggregateStore<D> for InMemoryStore<D> {
    fn find_by(&self, criteria: &Criteria) -> WalletResult<Vec<D>> {
        let data = self.read()?;
        let mut found = Vec::new();
        for record in data.values() {
            if criteria.matches(record)? {
                found.push(record.clone());
            }
        }
        Ok(found)
    }

    fn count(&self, criteria: &Criteria) -> WalletResult<usize> {
        Ok(self.find_by(criteria)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Note {
        id: String,
        owner: String,
        text: String,
    }

    impl AggregateData for Note {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, owner: &str, text: &str) -> Note {
        Note {
            id: id.into(),
            owner: owner.into(),
            text: text.into(),
        }
    }

    #[test]
    fn test_save_is_upsert() {
        let store = InMemoryStore::new("notes");
        store.save(&note("a", "u1", "first")).unwrap();
        store.save(&note("a", "u1", "second")).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.find_by_id("a").unwrap().unwrap().text, "second");
    }

    #[test]
    fn test_missing_is_none() {
        let store: InMemoryStore<Note> = InMemoryStore::new("notes");
        assert!(store.find_by_id("nope").unwrap().is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = InMemoryStore::new("notes");
        store.save(&note("a", "u1", "x")).unwrap();
        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_batch() {
        let store = InMemoryStore::new("notes");
        store
            .save_batch(&[note("a", "u1", "x"), note("b", "u2", "y")])
            .unwrap();
        let found = store.find_batch(&["b", "zzz", "a"]).unwrap();
        let ids: Vec<_> = found.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_query() {
        let store = InMemoryStore::new("notes");
        store
            .save_batch(&[
                note("a", "u1", "x"),
                note("b", "u2", "y"),
                note("c", "u1", "z"),
            ])
            .unwrap();
        let criteria = Criteria::new().eq("owner", "u1");
        assert_eq!(store.count(&criteria).unwrap(), 2);
        assert_eq!(store.find_by(&Criteria::new()).unwrap().len(), 3);
    }
}
