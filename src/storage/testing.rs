//! Store doubles shared by unit tests

use std::collections::HashSet;
use std::sync::Mutex;

use serde::Serialize;

use crate::error::{WalletError, WalletResult};

use super::{
    AggregateData, AggregateStore, BatchAggregateStore, Criteria, InMemoryStore,
    QueryAggregateStore,
};

/// In-memory store that rejects writes touching selected IDs
pub struct FailingStore<D> {
    inner: InMemoryStore<D>,
    failing: Mutex<HashSet<String>>,
}

impl<D: AggregateData> FailingStore<D> {
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: InMemoryStore::new(name),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Make every later `save` or `delete` of `id` fail
    pub fn fail_writes_for(&self, id: impl Into<String>) {
        self.failing.lock().unwrap().insert(id.into());
    }

    fn check(&self, id: &str) -> WalletResult<()> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(WalletError::Storage(format!("disk full writing {}", id)));
        }
        Ok(())
    }
}

impl<D: AggregateData> AggregateStore<D> for FailingStore<D> {
    fn save(&self, data: &D) -> WalletResult<()> {
        self.check(data.id())?;
        self.inner.save(data)
    }

    fn find_by_id(&self, id: &str) -> WalletResult<Option<D>> {
        self.inner.find_by_id(id)
    }

    fn delete(&self, id: &str) -> WalletResult<()> {
        self.check(id)?;
        self.inner.delete(id)
    }
}

impl<D: AggregateData> BatchAggregateStore<D> for FailingStore<D> {
    fn save_batch(&self, items: &[D]) -> WalletResult<()> {
        for item in items {
            self.check(item.id())?;
        }
        self.inner.save_batch(items)
    }

    fn find_batch(&self, ids: &[&str]) -> WalletResult<Vec<D>> {
        self.inner.find_batch(ids)
    }
}

impl<D: AggregateData + Serialize> QueryAggregateStore<D> for FailingStore<D> {
    fn find_by(&self, criteria: &Criteria) -> WalletResult<Vec<D>> {
        self.inner.find_by(criteria)
    }

    fn count(&self, criteria: &Criteria) -> WalletResult<usize> {
        self.inner.count(criteria)
    }
}
