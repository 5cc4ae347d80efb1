//! Wallet service
//!
//! Use cases over the wallet aggregate: creating and looking up wallets, and
//! recording expenses and incomes. Each mutation resolves its category, runs
//! the aggregate operation under the wallet's lock, persists the wallet and
//! writes an audit entry.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{WalletError, WalletResult};
use crate::models::{
    CategoryKind, ExpenseRecord, IncomeRecord, Money, SubcategoryId, UserId, Wallet, WalletId,
    WalletType,
};
use crate::storage::Storage;

/// Service for wallet management
pub struct WalletService<'a> {
    storage: &'a Storage,
}

impl<'a> WalletService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a wallet with a zero balance
    pub fn create_wallet(
        &self,
        user_id: &str,
        name: &str,
        wallet_type: WalletType,
        currency: &str,
    ) -> WalletResult<Wallet> {
        let wallet = Wallet::new(user_id, name.trim(), wallet_type, currency)?;
        self.persist_new(wallet)
    }

    /// Create and persist a wallet with a starting balance
    ///
    /// Nothing is stored when validation fails.
    pub fn create_wallet_with_initial_balance(
        &self,
        user_id: &str,
        name: &str,
        wallet_type: WalletType,
        currency: &str,
        initial_amount: i64,
    ) -> WalletResult<Wallet> {
        let wallet = Wallet::with_initial_balance(
            user_id,
            name.trim(),
            wallet_type,
            currency,
            initial_amount,
        )?;
        self.persist_new(wallet)
    }

    fn persist_new(&self, wallet: Wallet) -> WalletResult<Wallet> {
        self.storage.wallets.save(&wallet)?;
        self.storage.log_create(
            EntityType::Wallet,
            wallet.id().key(),
            Some(wallet.name().to_string()),
            &wallet,
        );
        info!(
            wallet = %wallet.id(),
            user = %wallet.user_id(),
            balance = %wallet.balance(),
            "created wallet"
        );
        Ok(wallet)
    }

    /// Summary wallet; fails with a Wallet not-found error when absent
    pub fn get_wallet(&self, id: WalletId) -> WalletResult<Wallet> {
        self.storage
            .wallets
            .find_by_id(id)?
            .ok_or_else(|| WalletError::wallet_not_found(id.key()))
    }

    /// Wallet with its full history
    pub fn get_wallet_with_transactions(&self, id: WalletId) -> WalletResult<Wallet> {
        self.storage
            .wallets
            .find_by_id_with_transactions(id)?
            .ok_or_else(|| WalletError::wallet_not_found(id.key()))
    }

    pub fn list_wallets(&self, user_id: &UserId) -> WalletResult<Vec<Wallet>> {
        self.storage.wallets.find_by_user_id(user_id)
    }

    /// Find one of the user's wallets by name (case-insensitive), full ID or
    /// short display ID
    pub fn find_wallet(&self, user_id: &UserId, identifier: &str) -> WalletResult<Option<Wallet>> {
        let identifier = identifier.trim();
        let wallets = self.list_wallets(user_id)?;

        if let Some(wallet) = wallets
            .iter()
            .find(|w| w.name().eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(wallet.clone()));
        }

        if let Ok(id) = identifier.parse::<WalletId>() {
            return Ok(wallets.into_iter().find(|w| w.id() == id));
        }

        let mut matches = wallets
            .into_iter()
            .filter(|w| w.id().to_string() == identifier);
        match (matches.next(), matches.next()) {
            (Some(wallet), None) => Ok(Some(wallet)),
            _ => Ok(None),
        }
    }

    /// Like [`find_wallet`](Self::find_wallet), failing when nothing matches
    pub fn resolve_wallet(&self, user_id: &UserId, identifier: &str) -> WalletResult<Wallet> {
        self.find_wallet(user_id, identifier)?
            .ok_or_else(|| WalletError::wallet_not_found(identifier))
    }

    pub fn rename_wallet(&self, id: WalletId, name: &str) -> WalletResult<Wallet> {
        self.storage.locks.with_lock(id, || -> WalletResult<Wallet> {
            let before = self.get_wallet(id)?;
            let mut wallet = before.clone();
            wallet.rename(name.trim())?;
            self.storage.wallets.save(&wallet)?;

            self.storage.log_update(
                EntityType::Wallet,
                id.key(),
                Some(wallet.name().to_string()),
                &before,
                &wallet,
                Some(format!("name: {} -> {}", before.name(), wallet.name())),
            );
            info!(wallet = %id, name = wallet.name(), "renamed wallet");
            Ok(wallet)
        })
    }

    /// Delete a wallet with its expense and income history
    pub fn delete_wallet(&self, id: WalletId) -> WalletResult<Wallet> {
        let deleted = self.storage.locks.with_lock(id, || -> WalletResult<Wallet> {
            let wallet = self.get_wallet(id)?;
            self.storage.wallets.delete(id)?;

            self.storage.log_delete(
                EntityType::Wallet,
                id.key(),
                Some(wallet.name().to_string()),
                &wallet,
            );
            info!(wallet = %id, "deleted wallet");
            Ok(wallet)
        });
        if deleted.as_ref().map_or_else(|e| e.is_not_found(), |_| true) {
            self.storage.locks.forget(id);
        }
        deleted
    }

    /// Record an expense against a wallet
    ///
    /// The subcategory must belong to an expense category owned by the
    /// wallet's user.
    pub fn add_expense(
        &self,
        wallet_id: WalletId,
        amount: Money,
        subcategory_id: &SubcategoryId,
        description: &str,
        date: NaiveDate,
    ) -> WalletResult<ExpenseRecord> {
        self.storage.locks.with_lock(wallet_id, || -> WalletResult<ExpenseRecord> {
            let mut wallet = self.get_wallet(wallet_id)?;
            self.storage.categories.resolve_subcategory(
                wallet.user_id(),
                subcategory_id,
                CategoryKind::Expense,
            )?;

            let before = wallet.balance().clone();
            let record = wallet.add_expense(amount, subcategory_id.clone(), description, date)?;
            self.storage.wallets.save(&wallet)?;

            self.storage.log_create(
                EntityType::Expense,
                record.id().key(),
                Some(wallet.name().to_string()),
                &record,
            );
            info!(
                wallet = %wallet_id,
                expense = %record.id(),
                amount = %record.amount(),
                balance = %wallet.balance(),
                previous = %before,
                "recorded expense"
            );
            Ok(record)
        })
    }

    /// Record an income against a wallet
    pub fn add_income(
        &self,
        wallet_id: WalletId,
        amount: Money,
        subcategory_id: &SubcategoryId,
        description: &str,
        date: NaiveDate,
    ) -> WalletResult<IncomeRecord> {
        self.storage.locks.with_lock(wallet_id, || -> WalletResult<IncomeRecord> {
            let mut wallet = self.get_wallet(wallet_id)?;
            self.storage.categories.resolve_subcategory(
                wallet.user_id(),
                subcategory_id,
                CategoryKind::Income,
            )?;

            let record = wallet.add_income(amount, subcategory_id.clone(), description, date)?;
            self.storage.wallets.save(&wallet)?;

            self.storage.log_create(
                EntityType::Income,
                record.id().key(),
                Some(wallet.name().to_string()),
                &record,
            );
            info!(
                wallet = %wallet_id,
                income = %record.id(),
                amount = %record.amount(),
                balance = %wallet.balance(),
                "recorded income"
            );
            Ok(record)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use crate::models::Category;
    use tempfile::TempDir;

    fn usd(amount: i64) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    /// Storage seeded with one expense and one income subcategory for user-1
    fn seeded() -> (Storage, SubcategoryId, SubcategoryId) {
        let storage = Storage::in_memory();

        let mut food = Category::new("user-1", "Food", CategoryKind::Expense).unwrap();
        let coffee = food.add_subcategory("Coffee").unwrap();
        storage.categories.save(&food).unwrap();

        let mut salary = Category::new("user-1", "Salary", CategoryKind::Income).unwrap();
        let base = salary.add_subcategory("Base").unwrap();
        storage.categories.save(&salary).unwrap();

        (storage, coffee.id, base.id)
    }

    #[test]
    fn test_create_and_get() {
        let (storage, _, _) = seeded();
        let service = WalletService::new(&storage);

        let created = service
            .create_wallet("user-1", "  Pocket ", WalletType::Cash, "USD")
            .unwrap();
        assert_eq!(created.name(), "Pocket");

        let loaded = service.get_wallet(created.id()).unwrap();
        assert_eq!(loaded.balance(), &usd(0));
        assert!(!loaded.is_fully_loaded());
    }

    #[test]
    fn test_get_missing_wallet() {
        let storage = Storage::in_memory();
        let service = WalletService::new(&storage);
        let err = service.get_wallet(WalletId::new()).unwrap_err();
        assert!(err.is_not_found_for("Wallet"));
    }

    #[test]
    fn test_expense_on_new_wallet_is_rejected() {
        let (storage, coffee, _) = seeded();
        let service = WalletService::new(&storage);
        let wallet = service
            .create_wallet("user-1", "Pocket", WalletType::Cash, "USD")
            .unwrap();

        let err = service
            .add_expense(wallet.id(), usd(2000), &coffee, "Coffee", date())
            .unwrap_err();
        assert!(matches!(err, WalletError::InsufficientBalance { .. }));

        let full = service.get_wallet_with_transactions(wallet.id()).unwrap();
        assert_eq!(full.balance(), &usd(0));
        assert!(full.expense_records().is_empty());
    }

    #[test]
    fn test_expense_persists_balance_and_record() {
        let (storage, coffee, _) = seeded();
        let service = WalletService::new(&storage);
        let wallet = service
            .create_wallet_with_initial_balance("user-1", "Pocket", WalletType::Cash, "USD", 10000)
            .unwrap();

        let record = service
            .add_expense(wallet.id(), usd(2000), &coffee, "Coffee", date())
            .unwrap();
        assert_eq!(record.subcategory_id(), &coffee);

        let full = service.get_wallet_with_transactions(wallet.id()).unwrap();
        assert_eq!(full.balance(), &usd(8000));
        assert_eq!(full.expense_records(), &[record]);
    }

    #[test]
    fn test_income_currency_mismatch_changes_nothing() {
        let (storage, _, base) = seeded();
        let service = WalletService::new(&storage);
        let wallet = service
            .create_wallet_with_initial_balance("user-1", "Pocket", WalletType::Bank, "USD", 10000)
            .unwrap();

        let eur = Money::new(500, "EUR").unwrap();
        let err = service
            .add_income(wallet.id(), eur, &base, "Bonus", date())
            .unwrap_err();
        assert!(matches!(err, WalletError::CurrencyMismatch { .. }));
        assert_eq!(service.get_wallet(wallet.id()).unwrap().balance(), &usd(10000));
    }

    #[test]
    fn test_negative_initial_balance_persists_nothing() {
        let storage = Storage::in_memory();
        let service = WalletService::new(&storage);

        let err = service
            .create_wallet_with_initial_balance("user-1", "Pocket", WalletType::Cash, "USD", -10000)
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidInitialBalance(-10000)));
        assert!(service.list_wallets(&UserId::from("user-1")).unwrap().is_empty());
    }

    #[test]
    fn test_subcategory_must_match_kind_and_owner() {
        let (storage, coffee, base) = seeded();
        let service = WalletService::new(&storage);
        let mine = service
            .create_wallet_with_initial_balance("user-1", "Pocket", WalletType::Cash, "USD", 1000)
            .unwrap();
        let theirs = service
            .create_wallet_with_initial_balance("user-2", "Other", WalletType::Cash, "USD", 1000)
            .unwrap();

        let err = service
            .add_expense(mine.id(), usd(10), &base, "", date())
            .unwrap_err();
        assert!(err.is_not_found_for("Subcategory"));

        let err = service
            .add_expense(theirs.id(), usd(10), &coffee, "", date())
            .unwrap_err();
        assert!(err.is_not_found_for("Subcategory"));

        assert_eq!(service.get_wallet(mine.id()).unwrap().balance(), &usd(1000));
    }

    #[test]
    fn test_find_wallet_by_name_or_id() {
        let storage = Storage::in_memory();
        let service = WalletService::new(&storage);
        let user = UserId::from("user-1");
        let wallet = service
            .create_wallet("user-1", "Travel Fund", WalletType::Bank, "EUR")
            .unwrap();

        let by_name = service.find_wallet(&user, "travel fund").unwrap().unwrap();
        assert_eq!(by_name.id(), wallet.id());

        let by_key = service.find_wallet(&user, &wallet.id().key()).unwrap().unwrap();
        assert_eq!(by_key.id(), wallet.id());

        let by_short = service
            .find_wallet(&user, &wallet.id().to_string())
            .unwrap()
            .unwrap();
        assert_eq!(by_short.id(), wallet.id());

        assert!(service
            .find_wallet(&UserId::from("user-2"), "Travel Fund")
            .unwrap()
            .is_none());
        assert!(service.resolve_wallet(&user, "nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_rename_and_delete() {
        let (storage, coffee, _) = seeded();
        let service = WalletService::new(&storage);
        let wallet = service
            .create_wallet_with_initial_balance("user-1", "Pocket", WalletType::Cash, "USD", 100)
            .unwrap();
        service
            .add_expense(wallet.id(), usd(10), &coffee, "", date())
            .unwrap();

        let renamed = service.rename_wallet(wallet.id(), "Jar").unwrap();
        assert_eq!(renamed.name(), "Jar");
        assert_eq!(renamed.balance(), &usd(90));
        assert!(matches!(
            service.rename_wallet(wallet.id(), " "),
            Err(WalletError::InvalidName)
        ));

        service.delete_wallet(wallet.id()).unwrap();
        assert!(service.get_wallet(wallet.id()).unwrap_err().is_not_found());
        assert!(service.delete_wallet(wallet.id()).unwrap_err().is_not_found());
        assert!(storage.locks.is_empty());
    }

    #[test]
    fn test_unwritable_audit_log_does_not_fail_committed_changes() {
        let temp_dir = TempDir::new().unwrap();
        let (storage, coffee, base) = seeded();
        // A directory cannot be opened for appending
        let storage = storage.with_audit(AuditLogger::new(temp_dir.path().to_path_buf()));
        let service = WalletService::new(&storage);

        let wallet = service
            .create_wallet_with_initial_balance("user-1", "Pocket", WalletType::Cash, "USD", 100)
            .unwrap();
        service
            .add_expense(wallet.id(), usd(30), &coffee, "Beans", date())
            .unwrap();
        service
            .add_income(wallet.id(), usd(5), &base, "Refund", date())
            .unwrap();
        service.rename_wallet(wallet.id(), "Jar").unwrap();

        let full = service.get_wallet_with_transactions(wallet.id()).unwrap();
        assert_eq!(full.balance(), &usd(75));
        assert_eq!(full.expense_records().len(), 1);
        assert_eq!(full.income_records().len(), 1);
        assert!(storage.audit().unwrap().read_all().is_err());
    }

    #[test]
    fn test_mutations_are_audited() {
        let temp_dir = TempDir::new().unwrap();
        let (storage, coffee, _) = seeded();
        let storage = storage.with_audit(AuditLogger::new(temp_dir.path().join("audit.log")));
        let service = WalletService::new(&storage);

        let wallet = service
            .create_wallet_with_initial_balance("user-1", "Pocket", WalletType::Cash, "USD", 100)
            .unwrap();
        let expense = service
            .add_expense(wallet.id(), usd(40), &coffee, "Beans", date())
            .unwrap();
        service.delete_wallet(wallet.id()).unwrap();

        let entries = storage.audit().unwrap().read_all().unwrap();
        let trail: Vec<_> = entries
            .iter()
            .map(|e| (e.operation, e.entity_type))
            .collect();
        assert_eq!(
            trail,
            vec![
                (Operation::Create, EntityType::Wallet),
                (Operation::Create, EntityType::Expense),
                (Operation::Delete, EntityType::Wallet),
            ]
        );
        assert_eq!(entries[1].entity_id, expense.id().key());
    }
}
