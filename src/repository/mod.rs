//! Domain-facing repositories
//!
//! Callers that load and mutate aggregates talk to these traits. The
//! store-backed implementations compose an [`AggregateStore`] per record type
//! with the matching [`AggregateMapper`], so swapping the storage engine never
//! touches the aggregates.
//!
//! [`AggregateStore`]: crate::storage::AggregateStore
//! [`AggregateMapper`]: crate::mapper::AggregateMapper

pub mod category;
pub mod wallet;

pub use category::StoreCategoryRepository;
pub use wallet::StoreWalletRepository;

use crate::error::WalletResult;
use crate::models::{
    Category, CategoryId, CategoryKind, Subcategory, SubcategoryId, UserId, Wallet, WalletId,
};

/// Persistence of wallet aggregates
pub trait WalletRepository: Send + Sync {
    /// Upsert the wallet and every record held in its collections
    fn save(&self, wallet: &Wallet) -> WalletResult<()>;

    /// Load a summary wallet: balance only, empty collections
    fn find_by_id(&self, id: WalletId) -> WalletResult<Option<Wallet>>;

    /// Load a wallet with its full expense, income and transfer history
    fn find_by_id_with_transactions(&self, id: WalletId) -> WalletResult<Option<Wallet>>;

    /// Summary wallets owned by a user, ordered by name
    fn find_by_user_id(&self, user_id: &UserId) -> WalletResult<Vec<Wallet>>;

    /// Remove a wallet and its expense and income records
    fn delete(&self, id: WalletId) -> WalletResult<()>;
}

/// Persistence and lookup of categories
pub trait CategoryRepository: Send + Sync {
    fn save(&self, category: &Category) -> WalletResult<()>;

    fn find_by_id(&self, id: CategoryId) -> WalletResult<Option<Category>>;

    fn find_by_user_id(&self, user_id: &UserId) -> WalletResult<Vec<Category>>;

    fn delete(&self, id: CategoryId) -> WalletResult<()>;

    /// Find the category of `kind` owned by `user_id` that contains the
    /// subcategory; fails with a Subcategory not-found error otherwise
    fn resolve_subcategory(
        &self,
        user_id: &UserId,
        subcategory_id: &SubcategoryId,
        kind: CategoryKind,
    ) -> WalletResult<(Category, Subcategory)>;
}
