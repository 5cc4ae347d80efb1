use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wallet_ledger::cli::{
    handle_category_command, handle_expense_command, handle_income_command,
    handle_transfer_command, handle_wallet_command, CategoryCommands, ExpenseCommands,
    IncomeCommands, TransferArgs, WalletCommands,
};
use wallet_ledger::config::{LedgerPaths, Settings};
use wallet_ledger::models::UserId;
use wallet_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "wallet",
    version,
    about = "Personal wallet ledger",
    long_about = "Track wallets in any currency, record expenses and incomes \
                  against your own categories, and move money between wallets."
)]
struct Cli {
    /// Owner of the wallets and categories being managed
    #[arg(long, global = true, env = "USER", default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet management commands
    #[command(subcommand)]
    Wallet(WalletCommands),

    /// Record expenses
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Record incomes
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Move money between two wallets
    Transfer(TransferArgs),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    let storage = Storage::open(&paths, &settings)?;
    let user = UserId::new(cli.user);

    match cli.command {
        Some(Commands::Wallet(cmd)) => handle_wallet_command(&storage, &settings, &user, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &user, cmd)?,
        Some(Commands::Income(cmd)) => handle_income_command(&storage, &user, cmd)?,
        Some(Commands::Transfer(args)) => handle_transfer_command(&storage, &user, args)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, &user, cmd)?,
        Some(Commands::Audit { limit }) => match storage.audit() {
            Some(logger) => {
                let entries = logger.read_recent(limit)?;
                if entries.is_empty() {
                    println!("No audit entries.");
                }
                for entry in entries {
                    println!("{}", entry);
                }
            }
            None => println!("Audit logging is disabled."),
        },
        Some(Commands::Config) => {
            println!("Wallet Ledger Configuration");
            println!("===========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Default currency: {}", settings.default_currency);
            println!("  Storage backend:  {}", settings.storage_backend);
            println!("  Audit enabled:    {}", settings.audit_enabled);
            println!("  Log filter:       {}", settings.log_filter);
            println!("  User:             {}", user);
        }
        None => {
            println!("wallet - personal wallet ledger");
            println!();
            println!("Run 'wallet --help' for usage information.");
        }
    }

    Ok(())
}
