//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print their
//! results and return service errors unchanged.

pub mod category;
pub mod entry;
pub mod transfer;
pub mod wallet;

pub use category::{handle_category_command, CategoryCommands};
pub use entry::{handle_expense_command, handle_income_command, ExpenseCommands, IncomeCommands};
pub use transfer::{handle_transfer_command, TransferArgs};
pub use wallet::{handle_wallet_command, WalletCommands};

use chrono::NaiveDate;

use crate::models::{CategoryKind, WalletType};

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', use YYYY-MM-DD", s))
}

pub fn parse_wallet_type(s: &str) -> Result<WalletType, String> {
    WalletType::parse(s).ok_or_else(|| {
        format!(
            "invalid wallet type '{}', expected one of: cash, bank, credit, investment",
            s
        )
    })
}

pub fn parse_category_kind(s: &str) -> Result<CategoryKind, String> {
    CategoryKind::parse(s)
        .ok_or_else(|| format!("invalid category kind '{}', expected expense or income", s))
}

/// The given date, or today in local time
fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| chrono::Local::now().date_naive())
}
