//! Money type for representing currency amounts
//!
//! Amounts are stored as integer base units (cents for USD, whole yen for JPY)
//! tagged with a three-letter currency code. Values are immutable: every
//! arithmetic operation returns a new `Money`, and mixing currencies is an
//! error rather than a silent conversion.

use serde::Serialize;
use std::fmt;

use crate::error::{WalletError, WalletResult};

/// A three-character currency code such as "USD" or "TWD"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Parse a currency code, rejecting anything that is not exactly 3 characters
    pub fn new(code: impl Into<String>) -> WalletResult<Self> {
        let code = code.into();
        if code.chars().count() != 3 {
            return Err(WalletError::InvalidCurrency(code));
        }
        Ok(Self(code))
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-negative amount in base units of a single currency
///
/// # Examples
/// ```
/// use wallet_ledger::models::Money;
/// let price = Money::new(2000, "USD").unwrap();
/// let balance = Money::new(10000, "USD").unwrap();
/// assert_eq!(balance.subtract(&price).unwrap().amount(), 8000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// Create a Money value
    ///
    /// Fails with `InvalidAmount` for negative amounts and `InvalidCurrency`
    /// for malformed codes.
    pub fn new(amount: i64, currency: impl Into<String>) -> WalletResult<Self> {
        if amount < 0 {
            return Err(WalletError::InvalidAmount(amount));
        }
        let currency = Currency::new(currency)?;
        Ok(Self { amount, currency })
    }

    /// Zero in the given currency
    pub fn zero(currency: &Currency) -> Self {
        Self {
            amount: 0,
            currency: currency.clone(),
        }
    }

    /// Amount in base units
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    /// Currency of this amount
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Check whether `other` is in the same currency
    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    /// Sum of two amounts in the same currency
    pub fn add(&self, other: &Money) -> WalletResult<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(WalletError::AmountOverflow)?;
        Ok(Self {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Difference of two amounts in the same currency
    ///
    /// Fails with `NegativeResult` when `other` is larger than `self`.
    pub fn subtract(&self, other: &Money) -> WalletResult<Money> {
        self.ensure_same_currency(other)?;
        if self.amount < other.amount {
            return Err(WalletError::NegativeResult {
                minuend: self.amount,
                subtrahend: other.amount,
            });
        }
        Ok(Self {
            amount: self.amount - other.amount,
            currency: self.currency.clone(),
        })
    }

    fn ensure_same_currency(&self, other: &Money) -> WalletResult<()> {
        if self.same_currency(other) {
            Ok(())
        } else {
            Err(WalletError::currency_mismatch(
                self.currency.as_str(),
                other.currency.as_str(),
            ))
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
