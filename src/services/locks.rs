//! Per-wallet mutation locks
//!
//! The wallet aggregate has no version field, so two writers loading the same
//! wallet would silently overwrite each other. Every mutating service call
//! runs inside [`WalletLocks::with_lock`] or [`WalletLocks::with_pair`].
//! Entries are created on first use and dropped when the wallet is deleted,
//! so the registry stays bounded by the number of live wallets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::WalletId;

/// Registry of one mutex per wallet ID
#[derive(Debug, Default)]
pub struct WalletLocks {
    registry: Mutex<HashMap<WalletId, Arc<Mutex<()>>>>,
}

impl WalletLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, id: WalletId) -> Arc<Mutex<()>> {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registry.entry(id).or_default().clone()
    }

    /// Run `f` while holding the lock for `id`
    pub fn with_lock<T>(&self, id: WalletId, f: impl FnOnce() -> T) -> T {
        let handle = self.handle(id);
        let _guard = acquire(&handle);
        f()
    }

    /// Run `f` while holding the locks for both wallets
    ///
    /// Locks are taken in ascending order of the wallet key, so two transfers
    /// between the same pair of wallets in opposite directions cannot deadlock.
    /// Passing the same ID twice takes its lock once.
    pub fn with_pair<T>(&self, a: WalletId, b: WalletId, f: impl FnOnce() -> T) -> T {
        if a == b {
            return self.with_lock(a, f);
        }
        let (first, second) = if a.key() < b.key() { (a, b) } else { (b, a) };

        let first = self.handle(first);
        let second = self.handle(second);
        let _first_guard = acquire(&first);
        let _second_guard = acquire(&second);
        f()
    }

    /// Drop the entry of a deleted wallet
    ///
    /// A thread already waiting on the old mutex still acquires it and then
    /// finds the wallet gone. Wallet IDs are never reused, so a fresh entry
    /// created afterwards cannot guard a live wallet concurrently with it.
    pub fn forget(&self, id: WalletId) {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&id);
    }

    /// Number of wallets currently holding an entry
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// The guarded value is `()`, so a panic while holding it leaves nothing
// inconsistent behind.
fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
