//! Storage layer for the wallet ledger
//!
//! Defines the persistence-agnostic aggregate store contract and the two
//! engines that implement it (in-memory and JSON file). Repositories in
//! [`crate::repository`] sit on top of these stores; nothing here knows about
//! wallets.
//!
//! The base contract is deliberately small. Bulk and query access are
//! separate capability traits so a store only has to offer what its engine
//! can do efficiently.

pub mod criteria;
pub mod file_io;
pub mod json_file;
pub mod memory;
#[cfg(test)]
pub(crate) mod testing;

pub use criteria::Criteria;
pub use file_io::{read_json, write_json_atomic};
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::config::settings::{Settings, StorageBackend};
use crate::error::WalletResult;
use crate::mapper::{CategoryData, ExpenseData, IncomeData, TransferData, WalletData};
use crate::repository::{
    CategoryRepository, StoreCategoryRepository, StoreWalletRepository, WalletRepository,
};
use crate::services::WalletLocks;

/// A storable shape identified by its own string ID
pub trait AggregateData: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Persistence contract every aggregate store implements
pub trait AggregateStore<D: AggregateData>: Send + Sync {
    /// Insert or replace the record with `data.id()`
    fn save(&self, data: &D) -> WalletResult<()>;

    /// Fetch a record; absence is `Ok(None)`, not an error
    fn find_by_id(&self, id: &str) -> WalletResult<Option<D>>;

    /// Remove a record; removing a missing ID succeeds
    fn delete(&self, id: &str) -> WalletResult<()>;
}

/// Bulk access for engines that can do it in one round trip
pub trait BatchAggregateStore<D: AggregateData>: AggregateStore<D> {
    fn save_batch(&self, items: &[D]) -> WalletResult<()>;

    /// Records for the IDs that exist, in request order
    fn find_batch(&self, ids: &[&str]) -> WalletResult<Vec<D>>;
}

/// Attribute-equality queries
pub trait QueryAggregateStore<D: AggregateData>: AggregateStore<D> {
    fn find_by(&self, criteria: &Criteria) -> WalletResult<Vec<D>>;

    fn count(&self, criteria: &Criteria) -> WalletResult<usize>;
}

/// A store with every capability, as the repository bridge needs it
pub trait RecordStore<D: AggregateData>: BatchAggregateStore<D> + QueryAggregateStore<D> {}

impl<D, S> RecordStore<D> for S
where
    D: AggregateData,
    S: BatchAggregateStore<D> + QueryAggregateStore<D>,
{
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    pub wallets: Arc<dyn WalletRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locks: WalletLocks,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open storage using the backend selected in settings
    pub fn open(paths: &LedgerPaths, settings: &Settings) -> WalletResult<Self> {
        let (wallets, categories): (Arc<dyn WalletRepository>, Arc<dyn CategoryRepository>) =
            match settings.storage_backend {
                StorageBackend::Json => {
                    paths.ensure_directories()?;
                    let wallets = StoreWalletRepository::new(
                        Arc::new(JsonFileStore::<WalletData>::open(paths.wallets_file())?),
                        Arc::new(JsonFileStore::<ExpenseData>::open(paths.expenses_file())?),
                        Arc::new(JsonFileStore::<IncomeData>::open(paths.incomes_file())?),
                        Arc::new(JsonFileStore::<TransferData>::open(paths.transfers_file())?),
                    );
                    let categories = StoreCategoryRepository::new(Arc::new(
                        JsonFileStore::<CategoryData>::open(paths.categories_file())?,
                    ));
                    (Arc::new(wallets), Arc::new(categories))
                }
                StorageBackend::Memory => (
                    Arc::new(StoreWalletRepository::in_memory()),
                    Arc::new(StoreCategoryRepository::in_memory()),
                ),
            };

        let audit = if settings.audit_enabled {
            paths.ensure_directories()?;
            Some(AuditLogger::new(paths.audit_log()))
        } else {
            None
        };

        Ok(Self {
            wallets,
            categories,
            locks: WalletLocks::new(),
            audit,
        })
    }

    /// Storage backed entirely by memory, without an audit log
    pub fn in_memory() -> Self {
        Self::with_repositories(
            Arc::new(StoreWalletRepository::in_memory()),
            Arc::new(StoreCategoryRepository::in_memory()),
        )
    }

    /// Storage over caller-supplied repositories
    pub fn with_repositories(
        wallets: Arc<dyn WalletRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            wallets,
            categories,
            locks: WalletLocks::new(),
            audit: None,
        }
    }

    /// Attach an audit logger
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Append an entry for a change that is already committed
    ///
    /// A failed audit write is logged and swallowed: reporting it as an error
    /// would tell the caller the change did not happen.
    fn record(&self, entry: impl FnOnce() -> AuditEntry) {
        let Some(logger) = &self.audit else {
            return;
        };
        let entry = entry();
        if let Err(e) = logger.log(&entry) {
            error!(
                operation = %entry.operation,
                entity = %entry.entity_type,
                id = %entry.entity_id,
                error = %e,
                "audit entry lost for committed change"
            );
        }
    }

    /// Append a create entry to the audit log, if enabled
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.record(|| AuditEntry::create(entity_type, entity_id, entity_name, entity));
    }

    /// Append an update entry to the audit log, if enabled
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) {
        self.record(|| {
            AuditEntry::update(entity_type, entity_id, entity_name, before, after, summary)
        });
    }

    /// Append a delete entry to the audit log, if enabled
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.record(|| AuditEntry::delete(entity_type, entity_id, entity_name, entity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserId, Wallet, WalletType};
    use tempfile::TempDir;

    #[test]
    fn test_json_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths, &Settings::default()).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(storage.audit().is_some());
    }

    #[test]
    fn test_json_storage_persists_across_opens() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let wallet = Wallet::new("user-1", "Pocket", WalletType::Cash, "USD").unwrap();

        {
            let storage = Storage::open(&paths, &Settings::default()).unwrap();
            storage.wallets.save(&wallet).unwrap();
        }

        let storage = Storage::open(&paths, &Settings::default()).unwrap();
        let found = storage.wallets.find_by_user_id(&UserId::from("user-1")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), wallet.id());
    }

    #[test]
    fn test_memory_backend() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            storage_backend: StorageBackend::Memory,
            audit_enabled: false,
            ..Settings::default()
        };
        let storage = Storage::open(&paths, &settings).unwrap();
        assert!(storage.audit().is_none());
        assert!(!temp_dir.path().join("data").exists());
    }
}
