//! Wallet aggregate
//!
//! A wallet owns a balance in one fixed currency and is the only place that
//! balance changes. Every operation validates first and mutates last, so a
//! failed call leaves the wallet exactly as it was.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

use super::ids::{SubcategoryId, UserId, WalletId};
use super::money::{Currency, Money};
use super::transaction::{ExpenseRecord, IncomeRecord, Transfer};
use crate::error::{WalletError, WalletResult};

/// Type of wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletType {
    Cash,
    Bank,
    Credit,
    Investment,
}

impl WalletType {
    /// Parse a wallet type from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CASH" => Some(Self::Cash),
            "BANK" => Some(Self::Bank),
            "CREDIT" => Some(Self::Credit),
            "INVESTMENT" => Some(Self::Investment),
            _ => None,
        }
    }

    /// Storage form of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Bank => "BANK",
            Self::Credit => "CREDIT",
            Self::Investment => "INVESTMENT",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Bank => write!(f, "Bank"),
            Self::Credit => write!(f, "Credit"),
            Self::Investment => write!(f, "Investment"),
        }
    }
}

/// How much of a wallet was read from storage
///
/// A `Summary` wallet carries only its balance; its collections hold nothing
/// but records created since it was loaded. A `FullyLoaded` wallet carries its
/// complete history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Summary,
    FullyLoaded,
}

/// A financial wallet
#[derive(Debug, Clone, Serialize)]
pub struct Wallet {
    id: WalletId,
    user_id: UserId,
    name: String,
    wallet_type: WalletType,
    balance: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    load_state: LoadState,
    expense_records: Vec<ExpenseRecord>,
    income_records: Vec<IncomeRecord>,
    transfers: Vec<Transfer>,
}

impl Wallet {
    /// Create a new wallet with a zero balance
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        wallet_type: WalletType,
        currency: impl Into<String>,
    ) -> WalletResult<Self> {
        let user_id = UserId::new(user_id);
        if user_id.is_empty() {
            return Err(WalletError::InvalidUserId);
        }
        let name = validate_name(name.into())?;
        let currency = Currency::new(currency)?;

        let now = Utc::now();
        Ok(Self {
            id: WalletId::new(),
            user_id,
            name,
            wallet_type,
            balance: Money::zero(&currency),
            created_at: now,
            updated_at: now,
            load_state: LoadState::FullyLoaded,
            expense_records: Vec::new(),
            income_records: Vec::new(),
            transfers: Vec::new(),
        })
    }

    /// Create a new wallet with a starting balance
    pub fn with_initial_balance(
        user_id: impl Into<String>,
        name: impl Into<String>,
        wallet_type: WalletType,
        currency: impl Into<String>,
        initial_amount: i64,
    ) -> WalletResult<Self> {
        if initial_amount < 0 {
            return Err(WalletError::InvalidInitialBalance(initial_amount));
        }
        let mut wallet = Self::new(user_id, name, wallet_type, currency)?;
        wallet.balance = Money::new(initial_amount, wallet.balance.currency().as_str())?;
        Ok(wallet)
    }

    /// Rebuild a summary wallet from persisted state
    pub(crate) fn restore(
        id: WalletId,
        user_id: UserId,
        name: String,
        wallet_type: WalletType,
        balance: Money,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            wallet_type,
            balance,
            created_at,
            updated_at,
            load_state: LoadState::Summary,
            expense_records: Vec::new(),
            income_records: Vec::new(),
            transfers: Vec::new(),
        }
    }

    /// Replace the collections with the full persisted history
    pub(crate) fn load_history(
        &mut self,
        expense_records: Vec<ExpenseRecord>,
        income_records: Vec<IncomeRecord>,
        transfers: Vec<Transfer>,
    ) {
        self.expense_records = expense_records;
        self.income_records = income_records;
        self.transfers = transfers;
        self.load_state = LoadState::FullyLoaded;
    }

    pub fn id(&self) -> WalletId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wallet_type(&self) -> WalletType {
        self.wallet_type
    }

    pub fn balance(&self) -> &Money {
        &self.balance
    }

    pub fn currency(&self) -> &Currency {
        self.balance.currency()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn expense_records(&self) -> &[ExpenseRecord] {
        &self.expense_records
    }

    pub fn income_records(&self) -> &[IncomeRecord] {
        &self.income_records
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.load_state == LoadState::FullyLoaded
    }

    /// Mark the wallet as fully loaded
    ///
    /// A fully loaded wallet never drops back to `Summary`, so passing `false`
    /// leaves the state unchanged. A fresh summary needs a fresh load.
    pub fn set_fully_loaded(&mut self, loaded: bool) {
        if loaded {
            self.load_state = LoadState::FullyLoaded;
        }
    }

    /// Rename the wallet
    pub fn rename(&mut self, name: impl Into<String>) -> WalletResult<()> {
        self.name = validate_name(name.into())?;
        self.touch();
        Ok(())
    }

    /// Spend money from this wallet
    ///
    /// Checks currency, then positivity, then available balance.
    pub fn add_expense(
        &mut self,
        amount: Money,
        subcategory_id: impl Into<SubcategoryId>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> WalletResult<ExpenseRecord> {
        self.ensure_currency(&amount)?;
        ensure_positive(&amount)?;
        let balance = self.debited(&amount)?;

        let record = ExpenseRecord::new(
            self.id,
            subcategory_id.into(),
            amount,
            description.into(),
            date,
        );
        self.balance = balance;
        self.expense_records.push(record.clone());
        self.touch();
        Ok(record)
    }

    /// Receive money into this wallet
    pub fn add_income(
        &mut self,
        amount: Money,
        subcategory_id: impl Into<SubcategoryId>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> WalletResult<IncomeRecord> {
        self.ensure_currency(&amount)?;
        ensure_positive(&amount)?;
        let balance = self.balance.add(&amount)?;

        let record = IncomeRecord::new(
            self.id,
            subcategory_id.into(),
            amount,
            description.into(),
            date,
        );
        self.balance = balance;
        self.income_records.push(record.clone());
        self.touch();
        Ok(record)
    }

    /// Debit the source side of a transfer: `amount + fee` leaves the wallet
    pub fn process_outgoing_transfer(&mut self, amount: &Money, fee: &Money) -> WalletResult<()> {
        self.ensure_currency(amount)?;
        self.ensure_currency(fee)?;
        ensure_positive(amount)?;

        let total = amount.add(fee)?;
        self.balance = self.debited(&total)?;
        self.touch();
        Ok(())
    }

    /// Credit the destination side of a transfer; the fee is not applied here
    pub fn process_incoming_transfer(&mut self, amount: &Money) -> WalletResult<()> {
        self.ensure_currency(amount)?;
        ensure_positive(amount)?;

        self.balance = self.balance.add(amount)?;
        self.touch();
        Ok(())
    }

    /// Undo a previously applied outgoing transfer, crediting `amount + fee` back
    pub fn reverse_outgoing_transfer(&mut self, amount: &Money, fee: &Money) -> WalletResult<()> {
        self.ensure_currency(amount)?;
        self.ensure_currency(fee)?;

        let total = amount.add(fee)?;
        self.balance = self.balance.add(&total)?;
        self.touch();
        Ok(())
    }

    /// Record a completed transfer in this wallet's history
    pub fn attach_transfer(&mut self, transfer: Transfer) {
        if transfer.involves(self.id) && !self.transfers.iter().any(|t| t.id() == transfer.id()) {
            self.transfers.push(transfer);
        }
    }

    fn ensure_currency(&self, amount: &Money) -> WalletResult<()> {
        if self.balance.same_currency(amount) {
            Ok(())
        } else {
            Err(WalletError::currency_mismatch(
                self.currency().as_str(),
                amount.currency().as_str(),
            ))
        }
    }

    fn debited(&self, amount: &Money) -> WalletResult<Money> {
        self.balance.subtract(amount).map_err(|e| match e {
            WalletError::NegativeResult { .. } => WalletError::InsufficientBalance {
                needed: amount.amount(),
                available: self.balance.amount(),
            },
            other => other,
        })
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.wallet_type)
    }
}

fn validate_name(name: String) -> WalletResult<String> {
    if name.trim().is_empty() {
        return Err(WalletError::InvalidName);
    }
    Ok(name)
}

fn ensure_positive(amount: &Money) -> WalletResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(WalletError::NonPositiveAmount)
    }
}
