//! Service layer for the wallet ledger
//!
//! Services are the callers the wallet aggregate expects: they resolve
//! categories, hold the per-wallet locks, persist through the repositories
//! and write the audit trail.

pub mod category;
pub mod locks;
pub mod transfer;
pub mod wallet;

pub use category::CategoryService;
pub use locks::WalletLocks;
pub use transfer::TransferService;
pub use wallet::WalletService;
