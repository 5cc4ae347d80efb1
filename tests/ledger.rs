//! End-to-end flows through the public API over file-backed storage

use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use wallet_ledger::config::{LedgerPaths, Settings};
use wallet_ledger::mapper::{
    AggregateMapper, ExpenseData, IncomeData, TransferData, WalletData, WalletMapper,
};
use wallet_ledger::models::{CategoryKind, Money, SubcategoryId, UserId, Wallet, WalletType};
use wallet_ledger::repository::{StoreWalletRepository, WalletRepository};
use wallet_ledger::services::{CategoryService, TransferService, WalletService};
use wallet_ledger::storage::{
    AggregateStore, Criteria, InMemoryStore, JsonFileStore, QueryAggregateStore, Storage,
};
use wallet_ledger::{ErrorKind, WalletError};

fn usd(amount: i64) -> Money {
    Money::new(amount, "USD").unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn open(dir: &TempDir) -> Storage {
    let paths = LedgerPaths::with_base_dir(dir.path().to_path_buf());
    Storage::open(&paths, &Settings::default()).unwrap()
}

fn coffee_for(storage: &Storage, user: &str) -> SubcategoryId {
    let categories = CategoryService::new(storage);
    let food = categories
        .create_category(user, "Food", CategoryKind::Expense)
        .unwrap();
    categories.add_subcategory(food.id(), "Coffee").unwrap().id
}

#[test]
fn test_history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let (checking, savings, coffee) = {
        let storage = open(&dir);
        let coffee = coffee_for(&storage, "alice");
        let wallets = WalletService::new(&storage);
        let checking = wallets
            .create_wallet_with_initial_balance("alice", "Checking", WalletType::Bank, "USD", 10000)
            .unwrap();
        let savings = wallets
            .create_wallet("alice", "Savings", WalletType::Bank, "USD")
            .unwrap();

        wallets
            .add_expense(checking.id(), usd(2000), &coffee, "Coffee", date(1))
            .unwrap();
        TransferService::new(&storage)
            .transfer(checking.id(), savings.id(), usd(3000), usd(100), "Save", date(2))
            .unwrap();
        (checking.id(), savings.id(), coffee)
    };

    let storage = open(&dir);
    let wallets = WalletService::new(&storage);

    let summary = wallets.get_wallet(checking).unwrap();
    assert!(!summary.is_fully_loaded());
    assert_eq!(summary.balance(), &usd(4900));

    let full = wallets.get_wallet_with_transactions(checking).unwrap();
    assert!(full.is_fully_loaded());
    assert_eq!(full.expense_records().len(), 1);
    assert_eq!(full.expense_records()[0].subcategory_id(), &coffee);
    assert_eq!(full.transfers().len(), 1);
    assert_eq!(full.transfers()[0].to_wallet_id(), savings);

    assert_eq!(wallets.get_wallet(savings).unwrap().balance(), &usd(3000));

    let entries = storage.audit().unwrap().read_all().unwrap();
    assert_eq!(entries.len(), 6);
}

#[test]
fn test_scenarios_through_services() {
    let storage = Storage::in_memory();
    let coffee = coffee_for(&storage, "alice");
    let wallets = WalletService::new(&storage);

    let empty = wallets
        .create_wallet("alice", "Empty", WalletType::Cash, "USD")
        .unwrap();
    let err = wallets
        .add_expense(empty.id(), usd(2000), &coffee, "Coffee", date(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BusinessRule);

    let funded = wallets
        .create_wallet_with_initial_balance("alice", "Funded", WalletType::Cash, "USD", 10000)
        .unwrap();
    wallets
        .add_expense(funded.id(), usd(2000), &coffee, "Coffee", date(1))
        .unwrap();
    assert_eq!(wallets.get_wallet(funded.id()).unwrap().balance(), &usd(8000));

    let err = wallets
        .create_wallet_with_initial_balance("alice", "Broke", WalletType::Cash, "USD", -10000)
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidInitialBalance(-10000)));
    assert_eq!(wallets.list_wallets(&UserId::from("alice")).unwrap().len(), 2);
}

#[test]
fn test_bridge_works_over_any_store() {
    let dir = TempDir::new().unwrap();
    let wallet_file = dir.path().join("wallets.json");

    let repo = StoreWalletRepository::new(
        Arc::new(JsonFileStore::<WalletData>::open(&wallet_file).unwrap()),
        Arc::new(InMemoryStore::<ExpenseData>::new("expenses")),
        Arc::new(InMemoryStore::<IncomeData>::new("incomes")),
        Arc::new(InMemoryStore::<TransferData>::new("transfers")),
    );
    let wallet = Wallet::with_initial_balance("alice", "Pocket", WalletType::Cash, "EUR", 1234)
        .unwrap();
    repo.save(&wallet).unwrap();

    let reopened = JsonFileStore::<WalletData>::open(&wallet_file).unwrap();
    let data = reopened.find_by_id(&wallet.id().key()).unwrap().unwrap();
    assert_eq!(data.balance_amount, 1234);
    assert_eq!(data.balance_currency, "EUR");
    assert_eq!(
        reopened
            .count(&Criteria::new().eq("user_id", "alice"))
            .unwrap(),
        1
    );

    let restored = WalletMapper.to_domain(data).unwrap();
    assert_eq!(restored.id(), wallet.id());
    assert_eq!(restored.name(), wallet.name());
    assert_eq!(restored.wallet_type(), wallet.wallet_type());
    assert_eq!(restored.balance(), wallet.balance());
}
