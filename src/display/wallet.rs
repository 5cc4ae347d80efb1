//! Wallet display formatting
//!
//! Formats wallets for terminal output in table, detail and history views.

use chrono::NaiveDate;

use crate::models::{LoadState, Wallet};

/// Format a list of wallets as a table
pub fn format_wallet_list(wallets: &[Wallet]) -> String {
    if wallets.is_empty() {
        return "No wallets found.\n".to_string();
    }

    let name_width = wallets
        .iter()
        .map(|w| w.name().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = format!(
        "{:<12}  {:<name_width$}  {:<10}  {:>16}\n",
        "ID", "Name", "Type", "Balance",
    );
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<10}  {:->16}\n",
        "", "", "", "",
    ));

    for wallet in wallets {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<10}  {:>16}\n",
            wallet.id().to_string(),
            wallet.name(),
            wallet.wallet_type().to_string(),
            wallet.balance().to_string(),
        ));
    }

    output
}

/// Format the details of one wallet
pub fn format_wallet_details(wallet: &Wallet) -> String {
    let mut output = String::new();
    output.push_str(&format!("Wallet: {}\n", wallet.name()));
    output.push_str(&format!("  ID:       {}\n", wallet.id().key()));
    output.push_str(&format!("  Owner:    {}\n", wallet.user_id()));
    output.push_str(&format!("  Type:     {}\n", wallet.wallet_type()));
    output.push_str(&format!("  Balance:  {}\n", wallet.balance()));
    output.push_str(&format!(
        "  Created:  {}\n",
        wallet.created_at().format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "  Updated:  {}\n",
        wallet.updated_at().format("%Y-%m-%d %H:%M")
    ));

    match wallet.load_state() {
        LoadState::FullyLoaded => output.push_str(&format!(
            "  Records:  {} expenses, {} incomes, {} transfers\n",
            wallet.expense_records().len(),
            wallet.income_records().len(),
            wallet.transfers().len()
        )),
        LoadState::Summary => output.push_str("  Records:  not loaded\n"),
    }
    output
}

struct HistoryRow {
    date: NaiveDate,
    kind: &'static str,
    amount: String,
    detail: String,
}

/// Format a fully loaded wallet's history, oldest first
///
/// Outgoing transfers show `amount + fee` as the debit.
pub fn format_wallet_history(wallet: &Wallet) -> String {
    let currency = wallet.currency().as_str();
    let mut rows: Vec<HistoryRow> = Vec::new();

    for record in wallet.expense_records() {
        rows.push(HistoryRow {
            date: record.date(),
            kind: "Expense",
            amount: format!("-{} {}", record.amount().amount(), currency),
            detail: format!("[{}] {}", record.subcategory_id(), record.description()),
        });
    }
    for record in wallet.income_records() {
        rows.push(HistoryRow {
            date: record.date(),
            kind: "Income",
            amount: format!("+{} {}", record.amount().amount(), currency),
            detail: format!("[{}] {}", record.subcategory_id(), record.description()),
        });
    }
    for transfer in wallet.transfers() {
        let (amount, counterpart) = if transfer.from_wallet_id() == wallet.id() {
            let debit = transfer.amount().amount().saturating_add(transfer.fee().amount());
            (format!("-{} {}", debit, currency), format!("to {}", transfer.to_wallet_id()))
        } else {
            (
                format!("+{} {}", transfer.amount().amount(), currency),
                format!("from {}", transfer.from_wallet_id()),
            )
        };
        let detail = if transfer.description().is_empty() {
            counterpart
        } else {
            format!("{}: {}", counterpart, transfer.description())
        };
        rows.push(HistoryRow {
            date: transfer.date(),
            kind: "Transfer",
            amount,
            detail,
        });
    }

    if rows.is_empty() {
        return "No transactions recorded.\n".to_string();
    }
    rows.sort_by_key(|r| r.date);

    let mut output = format!("{:<10}  {:<8}  {:>16}  {}\n", "Date", "Kind", "Amount", "Detail");
    output.push_str(&format!("{:-<10}  {:-<8}  {:->16}  {:-<20}\n", "", "", "", ""));
    for row in rows {
        output.push_str(&format!(
            "{:<10}  {:<8}  {:>16}  {}\n",
            row.date.format("%Y-%m-%d").to_string(),
            row.kind,
            row.amount,
            row.detail
        ));
    }
    output
}
