//! Custom error types for the wallet ledger
//!
//! This module defines the error hierarchy for the crate using thiserror.
//! Every variant belongs to one [`ErrorKind`] so callers can branch on the
//! category (rejected request, not found, storage failure) without matching
//! each variant.

use thiserror::Error;

/// Broad category of a [`WalletError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input is malformed
    Validation,
    /// Input is well-formed but violates a wallet invariant
    BusinessRule,
    /// A referenced entity does not exist
    Lookup,
    /// Storage engine or mapping failure
    Persistence,
    /// A multi-step operation stopped half way
    PartialFailure,
}

/// The main error type for wallet ledger operations
#[derive(Error, Debug)]
pub enum WalletError {
    /// User ID was empty
    #[error("Invalid user ID: user ID cannot be empty")]
    InvalidUserId,

    /// Wallet or category name was empty or whitespace
    #[error("Invalid name: name cannot be empty")]
    InvalidName,

    /// Currency code is not exactly three characters
    #[error("Invalid currency code: '{0}' (expected 3 characters)")]
    InvalidCurrency(String),

    /// Money amount below zero
    #[error("Invalid amount: {0} (amount cannot be negative)")]
    InvalidAmount(i64),

    /// Starting balance below zero
    #[error("Invalid initial balance: {0} (initial balance cannot be negative)")]
    InvalidInitialBalance(i64),

    /// Expense, income or transfer amount of zero
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Subtraction would go below zero
    #[error("Subtraction result would be negative: {minuend} - {subtrahend}")]
    NegativeResult { minuend: i64, subtrahend: i64 },

    /// Arithmetic exceeded the i64 range
    #[error("Amount overflow")]
    AmountOverflow,

    /// Wallet balance cannot cover the operation
    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: i64, available: i64 },

    /// Operands use different currencies
    #[error("Currency mismatch: expected {expected}, got {found}")]
    CurrencyMismatch { expected: String, found: String },

    /// Transfer source and destination are the same wallet
    #[error("Cannot transfer to the same wallet")]
    SameWalletTransfer,

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Persisted record could not be turned back into a domain object
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Incoming half of a transfer failed and the outgoing half could not be reversed
    #[error("Transfer incomplete: {cause}; compensation failed: {compensation}")]
    TransferIncomplete {
        cause: Box<WalletError>,
        compensation: Box<WalletError>,
    },
}

impl WalletError {
    /// Create a "not found" error for wallets
    pub fn wallet_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Wallet",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for subcategories
    pub fn subcategory_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Subcategory",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a currency mismatch error
    pub fn currency_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::CurrencyMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUserId
            | Self::InvalidName
            | Self::InvalidCurrency(_)
            | Self::InvalidAmount(_)
            | Self::InvalidInitialBalance(_)
            | Self::NonPositiveAmount
            | Self::SameWalletTransfer => ErrorKind::Validation,
            Self::NegativeResult { .. }
            | Self::AmountOverflow
            | Self::InsufficientBalance { .. }
            | Self::CurrencyMismatch { .. } => ErrorKind::BusinessRule,
            Self::NotFound { .. } => ErrorKind::Lookup,
            Self::Mapping(_)
            | Self::Storage(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_) => ErrorKind::Persistence,
            Self::TransferIncomplete { .. } => ErrorKind::PartialFailure,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a "not found" error for the given entity type
    pub fn is_not_found_for(&self, entity: &str) -> bool {
        matches!(self, Self::NotFound { entity_type, .. } if *entity_type == entity)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for wallet ledger operations
pub type WalletResult<T> = Result<T, WalletError>;
