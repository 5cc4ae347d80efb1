//! Configuration: where ledger files live and the user's preferences

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{Settings, StorageBackend};
