//! Wallet CLI commands

use clap::Subcommand;

use super::parse_wallet_type;
use crate::config::Settings;
use crate::display::{format_wallet_details, format_wallet_history, format_wallet_list};
use crate::error::WalletResult;
use crate::models::{UserId, WalletType};
use crate::services::WalletService;
use crate::storage::Storage;

/// Wallet subcommands
#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a new wallet
    Create {
        /// Wallet name
        name: String,
        /// Wallet type (cash, bank, credit, investment)
        #[arg(short = 't', long = "type", default_value = "cash", value_parser = parse_wallet_type)]
        wallet_type: WalletType,
        /// Three-letter currency code (defaults to the configured currency)
        #[arg(short, long)]
        currency: Option<String>,
        /// Starting balance in base units (e.g. cents)
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        balance: i64,
    },
    /// List your wallets
    List,
    /// Show wallet details
    Show {
        /// Wallet name or ID
        wallet: String,
        /// Include expense, income and transfer history
        #[arg(long)]
        history: bool,
    },
    /// Rename a wallet
    Rename {
        /// Wallet name or ID
        wallet: String,
        /// New name
        name: String,
    },
    /// Delete a wallet and its expense and income history
    Delete {
        /// Wallet name or ID
        wallet: String,
    },
}

/// Handle a wallet command
pub fn handle_wallet_command(
    storage: &Storage,
    settings: &Settings,
    user: &UserId,
    cmd: WalletCommands,
) -> WalletResult<()> {
    let service = WalletService::new(storage);

    match cmd {
        WalletCommands::Create {
            name,
            wallet_type,
            currency,
            balance,
        } => {
            let currency = currency.unwrap_or_else(|| settings.default_currency.clone());
            let wallet = if balance == 0 {
                service.create_wallet(user.as_str(), &name, wallet_type, &currency)?
            } else {
                service.create_wallet_with_initial_balance(
                    user.as_str(),
                    &name,
                    wallet_type,
                    &currency,
                    balance,
                )?
            };

            println!("Created wallet: {}", wallet.name());
            println!("  Type:    {}", wallet.wallet_type());
            println!("  Balance: {}", wallet.balance());
            println!("  ID:      {}", wallet.id().key());
        }

        WalletCommands::List => {
            let wallets = service.list_wallets(user)?;
            print!("{}", format_wallet_list(&wallets));
        }

        WalletCommands::Show { wallet, history } => {
            let found = service.resolve_wallet(user, &wallet)?;
            if history {
                let full = service.get_wallet_with_transactions(found.id())?;
                print!("{}", format_wallet_details(&full));
                println!();
                print!("{}", format_wallet_history(&full));
            } else {
                print!("{}", format_wallet_details(&found));
            }
        }

        WalletCommands::Rename { wallet, name } => {
            let found = service.resolve_wallet(user, &wallet)?;
            let renamed = service.rename_wallet(found.id(), &name)?;
            println!("Renamed wallet: {} -> {}", found.name(), renamed.name());
        }

        WalletCommands::Delete { wallet } => {
            let found = service.resolve_wallet(user, &wallet)?;
            let deleted = service.delete_wallet(found.id())?;
            println!("Deleted wallet: {}", deleted.name());
        }
    }

    Ok(())
}
