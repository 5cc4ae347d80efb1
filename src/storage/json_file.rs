//! JSON file aggregate store
//!
//! One file per aggregate type holding `{"records": [...]}`. The file is read
//! once when the store is opened; every mutation rewrites it atomically while
//! the write lock is held, so readers only ever see whole records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{WalletError, WalletResult};

use super::file_io::{read_json, write_json_atomic};
use super::{AggregateData, AggregateStore, BatchAggregateStore, Criteria, QueryAggregateStore};

/// On-disk layout of a store file
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile<D> {
    records: Vec<D>,
}

impl<D> Default for StoreFile<D> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

/// Store persisted to a single JSON file
pub struct JsonFileStore<D> {
    path: PathBuf,
    data: RwLock<BTreeMap<String, D>>,
}

impl<D> JsonFileStore<D>
where
    D: AggregateData + Serialize + DeserializeOwned,
{
    /// Open a store, loading any records already on disk
    pub fn open(path: impl Into<PathBuf>) -> WalletResult<Self> {
        let path = path.into();
        let file: StoreFile<D> = read_json(&path)?;

        let mut data = BTreeMap::new();
        for record in file.records {
            data.insert(record.id().to_string(), record);
        }
        debug!(path = %path.display(), count = data.len(), "opened json store");

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> WalletResult<std::sync::RwLockReadGuard<'_, BTreeMap<String, D>>> {
        self.data
            .read()
            .map_err(|e| WalletError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    /// Apply `change` to the map and flush it; the map is rolled back if the
    /// flush fails
    fn mutate<F>(&self, change: F) -> WalletResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, D>) -> bool,
    {
        let mut data = self
            .data
            .write()
            .map_err(|e| WalletError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let snapshot = data.clone();
        if !change(&mut data) {
            return Ok(());
        }

        let file = StoreFile {
            records: data.values().cloned().collect(),
        };
        if let Err(e) = write_json_atomic(&self.path, &file) {
            warn!(path = %self.path.display(), error = %e, "json store flush failed");
            *data = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

impl<D> AggregateStore<D> for JsonFileStore<D>
where
    D: AggregateData + Serialize + DeserializeOwned,
{
    fn save(&self, record: &D) -> WalletResult<()> {
        self.mutate(|data| {
            data.insert(record.id().to_string(), record.clone());
            true
        })?;
        debug!(path = %self.path.display(), id = record.id(), "saved record");
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> WalletResult<Option<D>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn delete(&self, id: &str) -> WalletResult<()> {
        self.mutate(|data| data.remove(id).is_some())
    }
}

impl<D> BatchAggregateStore<D> for JsonFileStore<D>
where
    D: AggregateData + Serialize + DeserializeOwned,
{
    fn save_batch(&self, items: &[D]) -> WalletResult<()> {
        self.mutate(|data| {
            for item in items {
                data.insert(item.id().to_string(), item.clone());
            }
            !items.is_empty()
        })
    }

    fn find_batch(&self, ids: &[&str]) -> WalletResult<Vec<D>> {
        let data = self.read()?;
        Ok(ids.iter().filter_map(|id| data.get(*id).cloned()).collect())
    }
}

impl<D> QueryAggregateStore<D> for JsonFileStore<D>
where
    D: AggregateData + Serialize + DeserializeOwned,
{
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
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

    fn create_test_store() -> (TempDir, JsonFileStore<Note>) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().join("notes.json")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_empty_open() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.find_by(&Criteria::new()).unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_and_reopen() {
        let (temp_dir, store) = create_test_store();
        store.save(&note("a", "u1", "first")).unwrap();
        store.save(&note("a", "u1", "second")).unwrap();

        let reopened: JsonFileStore<Note> =
            JsonFileStore::open(temp_dir.path().join("notes.json")).unwrap();
        let all = reopened.find_by(&Criteria::new()).unwrap();
        assert_eq!(all, vec![note("a", "u1", "second")]);
    }

    #[test]
    fn test_delete_twice() {
        let (temp_dir, store) = create_test_store();
        store.save(&note("a", "u1", "x")).unwrap();
        store.delete("a").unwrap();
        store.delete("a").unwrap();

        let reopened: JsonFileStore<Note> =
            JsonFileStore::open(temp_dir.path().join("notes.json")).unwrap();
        assert!(reopened.find_by_id("a").unwrap().is_none());
    }

    #[test]
    fn test_batch_and_query() {
        let (_temp_dir, store) = create_test_store();
        store
            .save_batch(&[note("a", "u1", "x"), note("b", "u2", "y")])
            .unwrap();

        assert_eq!(store.find_batch(&["a", "b", "c"]).unwrap().len(), 2);
        assert_eq!(store.count(&Criteria::new().eq("owner", "u2")).unwrap(), 1);
    }

    #[test]
    fn test_failed_flush_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = temp_dir.path().join("notes.json");
        std::fs::create_dir_all(path.join("occupied")).unwrap();
        let store: JsonFileStore<Note> = JsonFileStore {
            path,
            data: RwLock::new(BTreeMap::new()),
        };

        assert!(store.save(&note("a", "u1", "x")).is_err());
        assert!(store.find_by_id("a").unwrap().is_none());
    }
}
