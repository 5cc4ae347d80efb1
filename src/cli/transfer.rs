//! Transfer CLI command

use chrono::NaiveDate;
use clap::Args;

use super::{date_or_today, parse_date};
use crate::error::WalletResult;
use crate::models::{Money, UserId};
use crate::services::{TransferService, WalletService};
use crate::storage::Storage;

/// Arguments of `wallet transfer`
#[derive(Args)]
pub struct TransferArgs {
    /// Source wallet name or ID
    pub from: String,
    /// Destination wallet name or ID
    pub to: String,
    /// Amount in base units, in the source wallet's currency
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
    /// Fee charged to the source wallet, in base units
    #[arg(short, long, default_value_t = 0)]
    pub fee: i64,
    /// Description
    #[arg(short = 'm', long, default_value = "")]
    pub description: String,
    /// Date (YYYY-MM-DD, defaults to today)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

pub fn handle_transfer_command(
    storage: &Storage,
    user: &UserId,
    args: TransferArgs,
) -> WalletResult<()> {
    let wallets = WalletService::new(storage);
    let from = wallets.resolve_wallet(user, &args.from)?;
    let to = wallets.resolve_wallet(user, &args.to)?;

    let currency = from.currency().as_str();
    let transfer = TransferService::new(storage).transfer(
        from.id(),
        to.id(),
        Money::new(args.amount, currency)?,
        Money::new(args.fee, currency)?,
        &args.description,
        date_or_today(args.date),
    )?;

    println!(
        "Transferred {} from {} to {}",
        transfer.amount(),
        from.name(),
        to.name()
    );
    if !transfer.fee().is_zero() {
        println!("  Fee:  {}", transfer.fee());
    }
    println!("  Date: {}", transfer.date());
    println!("  ID:   {}", transfer.id().key());
    Ok(())
}
