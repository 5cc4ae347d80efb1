//! Wallet ledger: personal wallets, categorised expenses and incomes, and
//! transfers between wallets
//!
//! # Architecture
//!
//! - `models`: the wallet aggregate, money, ledger records and categories
//! - `storage`: generic aggregate stores (in-memory, JSON file) and the
//!   `Storage` coordinator
//! - `mapper`: flat persisted records and the mappers to and from the domain
//! - `repository`: domain-facing repositories bridging aggregates to stores
//! - `services`: use cases with locking, category lookup and the transfer saga
//! - `audit`: append-only audit trail
//! - `config`: paths and settings
//! - `cli` / `display`: the `wallet` command line
//!
//! # Example
//!
//! ```
//! use wallet_ledger::models::WalletType;
//! use wallet_ledger::services::WalletService;
//! use wallet_ledger::storage::Storage;
//!
//! let storage = Storage::in_memory();
//! let service = WalletService::new(&storage);
//! let wallet = service
//!     .create_wallet_with_initial_balance("alice", "Checking", WalletType::Bank, "USD", 10000)
//!     .unwrap();
//! assert_eq!(wallet.balance().amount(), 10000);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod mapper;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

pub use error::{ErrorKind, WalletError, WalletResult};
