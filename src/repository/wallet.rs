//! Store-backed wallet repository
//!
//! Wallet summaries, expenses, incomes and transfers each live in their own
//! store. A summary read touches only the wallet store; the history stores
//! are queried by wallet ID when a full load is requested.
//!
//! The stores share no transaction, so `save` writes the history first and
//! the wallet record last. When any write fails, the history records that
//! save added are removed again and the stored wallet is left as it was.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::error::WalletResult;
use crate::mapper::{
    AggregateMapper, ExpenseData, ExpenseMapper, IncomeData, IncomeMapper, TransferData,
    TransferMapper, WalletData, WalletMapper,
};
use crate::models::{UserId, Wallet, WalletId};
use crate::storage::{
    AggregateData, AggregateStore, BatchAggregateStore, Criteria, InMemoryStore,
    QueryAggregateStore, RecordStore,
};

use super::WalletRepository;

/// Wallet repository over any set of record stores
pub struct StoreWalletRepository {
    wallets: Arc<dyn RecordStore<WalletData>>,
    expenses: Arc<dyn RecordStore<ExpenseData>>,
    incomes: Arc<dyn RecordStore<IncomeData>>,
    transfers: Arc<dyn RecordStore<TransferData>>,
}

impl StoreWalletRepository {
    pub fn new(
        wallets: Arc<dyn RecordStore<WalletData>>,
        expenses: Arc<dyn RecordStore<ExpenseData>>,
        incomes: Arc<dyn RecordStore<IncomeData>>,
        transfers: Arc<dyn RecordStore<TransferData>>,
    ) -> Self {
        Self {
            wallets,
            expenses,
            incomes,
            transfers,
        }
    }

    /// Repository over fresh in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::<WalletData>::new("wallets")),
            Arc::new(InMemoryStore::<ExpenseData>::new("expenses")),
            Arc::new(InMemoryStore::<IncomeData>::new("incomes")),
            Arc::new(InMemoryStore::<TransferData>::new("transfers")),
        )
    }

    fn load_history(&self, wallet: &mut Wallet) -> WalletResult<()> {
        let key = wallet.id().key();

        let mut expenses = self
            .expenses
            .find_by(&Criteria::new().eq("wallet_id", key.as_str()))?
            .into_iter()
            .map(|d| ExpenseMapper.to_domain(d))
            .collect::<WalletResult<Vec<_>>>()?;
        expenses.sort_by_key(|r| (r.date(), r.created_at()));

        let mut incomes = self
            .incomes
            .find_by(&Criteria::new().eq("wallet_id", key.as_str()))?
            .into_iter()
            .map(|d| IncomeMapper.to_domain(d))
            .collect::<WalletResult<Vec<_>>>()?;
        incomes.sort_by_key(|r| (r.date(), r.created_at()));

        let mut transfer_data = self
            .transfers
            .find_by(&Criteria::new().eq("from_wallet_id", key.as_str()))?;
        transfer_data.extend(
            self.transfers
                .find_by(&Criteria::new().eq("to_wallet_id", key.as_str()))?,
        );
        let mut transfers = transfer_data
            .into_iter()
            .map(|d| TransferMapper.to_domain(d))
            .collect::<WalletResult<Vec<_>>>()?;
        transfers.sort_by_key(|t| (t.date(), t.created_at()));

        debug!(
            wallet = %wallet.id(),
            expenses = expenses.len(),
            incomes = incomes.len(),
            transfers = transfers.len(),
            "loaded wallet history"
        );
        wallet.load_history(expenses, incomes, transfers);
        Ok(())
    }

    /// Store the history records, then the wallet record that carries the
    /// balance. IDs of history records that did not exist before are
    /// collected into `inserted`.
    fn write(&self, wallet: &Wallet, inserted: &mut Inserted) -> WalletResult<()> {
        let expenses: Vec<_> = wallet
            .expense_records()
            .iter()
            .map(|r| ExpenseMapper.to_data(r))
            .collect();
        inserted.expenses = insert_batch(self.expenses.as_ref(), &expenses)?;

        let incomes: Vec<_> = wallet
            .income_records()
            .iter()
            .map(|r| IncomeMapper.to_data(r))
            .collect();
        inserted.incomes = insert_batch(self.incomes.as_ref(), &incomes)?;

        let transfers: Vec<_> = wallet
            .transfers()
            .iter()
            .map(|t| TransferMapper.to_data(t))
            .collect();
        inserted.transfers = insert_batch(self.transfers.as_ref(), &transfers)?;

        self.wallets.save(&WalletMapper.to_data(wallet))
    }

    /// Remove history records written by a save that did not complete
    fn discard(&self, inserted: &Inserted) {
        remove_all(self.expenses.as_ref(), &inserted.expenses);
        remove_all(self.incomes.as_ref(), &inserted.incomes);
        remove_all(self.transfers.as_ref(), &inserted.transfers);
    }
}

/// History records a single save added to the stores
#[derive(Default)]
struct Inserted {
    expenses: Vec<String>,
    incomes: Vec<String>,
    transfers: Vec<String>,
}

/// Save `records` and return the IDs that were not stored before
fn insert_batch<D: AggregateData>(
    store: &dyn RecordStore<D>,
    records: &[D],
) -> WalletResult<Vec<String>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<&str> = records.iter().map(|r| r.id()).collect();
    let existing: HashSet<String> = store
        .find_batch(&ids)?
        .iter()
        .map(|r| r.id().to_string())
        .collect();

    store.save_batch(records)?;
    Ok(ids
        .into_iter()
        .filter(|id| !existing.contains(*id))
        .map(str::to_string)
        .collect())
}

fn remove_all<D: AggregateData>(store: &dyn RecordStore<D>, ids: &[String]) {
    for id in ids {
        if let Err(e) = store.delete(id) {
            error!(id = %id, error = %e, "could not remove orphaned history record");
        }
    }
}

impl WalletRepository for StoreWalletRepository {
    fn save(&self, wallet: &Wallet) -> WalletResult<()> {
        let mut inserted = Inserted::default();
        match self.write(wallet, &mut inserted) {
            Ok(()) => {
                debug!(wallet = %wallet.id(), balance = %wallet.balance(), "saved wallet");
                Ok(())
            }
            Err(cause) => {
                warn!(
                    wallet = %wallet.id(),
                    error = %cause,
                    "wallet save failed, removing its new history records"
                );
                self.discard(&inserted);
                Err(cause)
            }
        }
    }

    fn find_by_id(&self, id: WalletId) -> WalletResult<Option<Wallet>> {
        self.wallets
            .find_by_id(&id.key())?
            .map(|data| WalletMapper.to_domain(data))
            .transpose()
    }

    fn find_by_id_with_transactions(&self, id: WalletId) -> WalletResult<Option<Wallet>> {
        let Some(mut wallet) = self.find_by_id(id)? else {
            return Ok(None);
        };
        self.load_history(&mut wallet)?;
        Ok(Some(wallet))
    }

    fn find_by_user_id(&self, user_id: &UserId) -> WalletResult<Vec<Wallet>> {
        let mut wallets = self
            .wallets
            .find_by(&Criteria::new().eq("user_id", user_id.as_str()))?
            .into_iter()
            .map(|d| WalletMapper.to_domain(d))
            .collect::<WalletResult<Vec<_>>>()?;
        wallets.sort_by(|a, b| a.name().cmp(b.name()).then(a.created_at().cmp(&b.created_at())));
        Ok(wallets)
    }

    fn delete(&self, id: WalletId) -> WalletResult<()> {
        let key = id.key();
        let by_wallet = Criteria::new().eq("wallet_id", key.as_str());

        for expense in self.expenses.find_by(&by_wallet)? {
            self.expenses.delete(&expense.id)?;
        }
        for income in self.incomes.find_by(&by_wallet)? {
            self.incomes.delete(&income.id)?;
        }
        self.wallets.delete(&key)?;

        debug!(wallet = %id, "deleted wallet");
        Ok(())
    }
}
