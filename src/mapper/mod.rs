//! Mapping between domain aggregates and their storable records
//!
//! Records are flat serde structs: IDs as strings, money as an integer amount
//! plus a separate three-character currency field. Reading a record back
//! re-runs domain validation; a stored value the domain would reject becomes a
//! `Mapping` error instead of a half-valid object.

pub mod category;
pub mod transaction;
pub mod wallet;

pub use category::{CategoryData, CategoryMapper, SubcategoryData};
pub use transaction::{
    ExpenseData, ExpenseMapper, IncomeData, IncomeMapper, TransferData, TransferMapper,
};
pub use wallet::{WalletData, WalletMapper};

use std::str::FromStr;

use crate::error::{WalletError, WalletResult};
use crate::models::Money;
use crate::storage::AggregateData;

/// Converts one aggregate type to and from its storable record
pub trait AggregateMapper: Send + Sync {
    type Domain;
    type Data: AggregateData;

    fn to_data(&self, domain: &Self::Domain) -> Self::Data;

    fn to_domain(&self, data: Self::Data) -> WalletResult<Self::Domain>;
}

/// Parse a stored ID field
pub(crate) fn parse_id<T>(field: &str, raw: &str) -> WalletResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| WalletError::Mapping(format!("invalid {} '{}': {}", field, raw, e)))
}

/// Rebuild a stored amount, applying the same validation as `Money::new`
pub(crate) fn restore_money(field: &str, amount: i64, currency: &str) -> WalletResult<Money> {
    Money::new(amount, currency)
        .map_err(|e| WalletError::Mapping(format!("invalid {}: {}", field, e)))
}
