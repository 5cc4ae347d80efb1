//! Transaction records produced by the wallet aggregate
//!
//! Expense and income records are created only as the side effect of a
//! successful wallet operation and are immutable afterwards. They point back
//! at their wallet by ID rather than holding a reference to it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

use super::ids::{ExpenseId, IncomeId, SubcategoryId, TransferId, WalletId};
use super::money::Money;
use crate::error::{WalletError, WalletResult};

/// Money leaving a wallet, classified by an expense subcategory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRecord {
    id: ExpenseId,
    wallet_id: WalletId,
    subcategory_id: SubcategoryId,
    amount: Money,
    description: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExpenseRecord {
    pub(crate) fn new(
        wallet_id: WalletId,
        subcategory_id: SubcategoryId,
        amount: Money,
        description: String,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            wallet_id,
            subcategory_id,
            amount,
            description,
            date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record from persisted state
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: ExpenseId,
        wallet_id: WalletId,
        subcategory_id: SubcategoryId,
        amount: Money,
        description: String,
        date: NaiveDate,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wallet_id,
            subcategory_id,
            amount,
            description,
            date,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn subcategory_id(&self) -> &SubcategoryId {
        &self.subcategory_id
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{} {}", self.date, self.amount, self.description)
    }
}

/// Money entering a wallet, classified by an income subcategory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeRecord {
    id: IncomeId,
    wallet_id: WalletId,
    subcategory_id: SubcategoryId,
    amount: Money,
    description: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IncomeRecord {
    pub(crate) fn new(
        wallet_id: WalletId,
        subcategory_id: SubcategoryId,
        amount: Money,
        description: String,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: IncomeId::new(),
            wallet_id,
            subcategory_id,
            amount,
            description,
            date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record from persisted state
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: IncomeId,
        wallet_id: WalletId,
        subcategory_id: SubcategoryId,
        amount: Money,
        description: String,
        date: NaiveDate,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wallet_id,
            subcategory_id,
            amount,
            description,
            date,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> IncomeId {
        self.id
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn subcategory_id(&self) -> &SubcategoryId {
        &self.subcategory_id
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl fmt::Display for IncomeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} +{} {}", self.date, self.amount, self.description)
    }
}

/// A movement of money between two wallets
///
/// The fee is charged to the source wallet only; the destination receives
/// `amount`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    id: TransferId,
    from_wallet_id: WalletId,
    to_wallet_id: WalletId,
    amount: Money,
    fee: Money,
    description: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Transfer {
    /// Create a transfer description
    ///
    /// Rejects transfers to the same wallet, a zero amount, and a fee in a
    /// different currency from the amount.
    pub fn new(
        from_wallet_id: WalletId,
        to_wallet_id: WalletId,
        amount: Money,
        fee: Money,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> WalletResult<Self> {
        if from_wallet_id == to_wallet_id {
            return Err(WalletError::SameWalletTransfer);
        }
        if !amount.same_currency(&fee) {
            return Err(WalletError::currency_mismatch(
                amount.currency().as_str(),
                fee.currency().as_str(),
            ));
        }
        if !amount.is_positive() {
            return Err(WalletError::NonPositiveAmount);
        }

        Ok(Self {
            id: TransferId::new(),
            from_wallet_id,
            to_wallet_id,
            amount,
            fee,
            description: description.into(),
            date,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a transfer from persisted state
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: TransferId,
        from_wallet_id: WalletId,
        to_wallet_id: WalletId,
        amount: Money,
        fee: Money,
        description: String,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            from_wallet_id,
            to_wallet_id,
            amount,
            fee,
            description,
            date,
            created_at,
        }
    }

    pub fn id(&self) -> TransferId {
        self.id
    }

    pub fn from_wallet_id(&self) -> WalletId {
        self.from_wallet_id
    }

    pub fn to_wallet_id(&self) -> WalletId {
        self.to_wallet_id
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn fee(&self) -> &Money {
        &self.fee
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this transfer touches the given wallet on either side
    pub fn involves(&self, wallet_id: WalletId) -> bool {
        self.from_wallet_id == wallet_id || self.to_wallet_id == wallet_id
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {} (fee {})",
            self.date, self.from_wallet_id, self.to_wallet_id, self.amount, self.fee
        )
    }
}
