//! Core data models for the wallet ledger
//!
//! This module contains the domain: money, wallets, the records wallets
//! produce, and the categories those records are filed under.

pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;
pub mod wallet;

pub use category::{Category, CategoryKind, Subcategory};
pub use ids::{CategoryId, ExpenseId, IncomeId, SubcategoryId, TransferId, UserId, WalletId};
pub use money::{Currency, Money};
pub use transaction::{ExpenseRecord, IncomeRecord, Transfer};
pub use wallet::{LoadState, Wallet, WalletType};
