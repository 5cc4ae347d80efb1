//! Expense and income CLI commands

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{date_or_today, parse_date};
use crate::error::WalletResult;
use crate::models::{Money, SubcategoryId, UserId, Wallet};
use crate::services::WalletService;
use crate::storage::Storage;

/// Arguments shared by `expense add` and `income add`
#[derive(Args)]
pub struct EntryArgs {
    /// Wallet name or ID
    pub wallet: String,
    /// Amount in base units (e.g. cents)
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
    /// Subcategory ID
    #[arg(short, long)]
    pub subcategory: String,
    /// Description
    #[arg(short = 'm', long, default_value = "")]
    pub description: String,
    /// Date (YYYY-MM-DD, defaults to today)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
    /// Currency of the amount (defaults to the wallet's currency)
    #[arg(short, long)]
    pub currency: Option<String>,
}

impl EntryArgs {
    fn money(&self, wallet: &Wallet) -> WalletResult<Money> {
        let currency = self
            .currency
            .clone()
            .unwrap_or_else(|| wallet.currency().to_string());
        Money::new(self.amount, currency)
    }
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record money spent from a wallet
    Add(EntryArgs),
}

#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record money received into a wallet
    Add(EntryArgs),
}

pub fn handle_expense_command(
    storage: &Storage,
    user: &UserId,
    cmd: ExpenseCommands,
) -> WalletResult<()> {
    let service = WalletService::new(storage);

    match cmd {
        ExpenseCommands::Add(args) => {
            let wallet = service.resolve_wallet(user, &args.wallet)?;
            let record = service.add_expense(
                wallet.id(),
                args.money(&wallet)?,
                &SubcategoryId::new(args.subcategory.as_str()),
                &args.description,
                date_or_today(args.date),
            )?;
            let balance = service.get_wallet(wallet.id())?;
            println!("Recorded expense {} on {}", record.amount(), record.date());
            println!("  Wallet:  {}", wallet.name());
            println!("  Balance: {}", balance.balance());
            println!("  ID:      {}", record.id().key());
        }
    }
    Ok(())
}

pub fn handle_income_command(
    storage: &Storage,
    user: &UserId,
    cmd: IncomeCommands,
) -> WalletResult<()> {
    let service = WalletService::new(storage);

    match cmd {
        IncomeCommands::Add(args) => {
            let wallet = service.resolve_wallet(user, &args.wallet)?;
            let record = service.add_income(
                wallet.id(),
                args.money(&wallet)?,
                &SubcategoryId::new(args.subcategory.as_str()),
                &args.description,
                date_or_today(args.date),
            )?;
            let balance = service.get_wallet(wallet.id())?;
            println!("Recorded income {} on {}", record.amount(), record.date());
            println!("  Wallet:  {}", wallet.name());
            println!("  Balance: {}", balance.balance());
            println!("  ID:      {}", record.id().key());
        }
    }
    Ok(())
}
