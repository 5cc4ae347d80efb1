//! Expense, income and transfer records and mappers

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{parse_id, restore_money, AggregateMapper};
use crate::error::{WalletError, WalletResult};
use crate::models::{
    ExpenseId, ExpenseRecord, IncomeId, IncomeRecord, SubcategoryId, Transfer, TransferId,
    WalletId,
};
use crate::storage::AggregateData;

/// Expense and income records share one stored layout
macro_rules! define_entry_mapper {
    ($data:ident, $mapper:ident, $record:ident, $id:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $data {
            pub id: String,
            pub wallet_id: String,
            pub subcategory_id: String,
            pub amount: i64,
            pub currency: String,
            pub description: String,
            pub date: NaiveDate,
            pub created_at: DateTime<Utc>,
            pub updated_at: DateTime<Utc>,
        }

        impl AggregateData for $data {
            fn id(&self) -> &str {
                &self.id
            }
        }

        #[derive(Debug, Clone, Copy, Default)]
        pub struct $mapper;

        impl AggregateMapper for $mapper {
            type Domain = $record;
            type Data = $data;

            fn to_data(&self, record: &$record) -> $data {
                $data {
                    id: record.id().key(),
                    wallet_id: record.wallet_id().key(),
                    subcategory_id: record.subcategory_id().to_string(),
                    amount: record.amount().amount(),
                    currency: record.amount().currency().to_string(),
                    description: record.description().to_string(),
                    date: record.date(),
                    created_at: record.created_at(),
                    updated_at: record.updated_at(),
                }
            }

            fn to_domain(&self, data: $data) -> WalletResult<$record> {
                let id: $id = parse_id(concat!($label, " id"), &data.id)?;
                let wallet_id: WalletId = parse_id("wallet id", &data.wallet_id)?;
                let amount =
                    restore_money(concat!($label, " amount"), data.amount, &data.currency)?;
                if !amount.is_positive() {
                    return Err(WalletError::Mapping(format!(
                        "{} {} has a zero amount",
                        $label, data.id
                    )));
                }

                Ok($record::restore(
                    id,
                    wallet_id,
                    SubcategoryId::new(data.subcategory_id),
                    amount,
                    data.description,
                    data.date,
                    data.created_at,
                    data.updated_at,
                ))
            }
        }
    };
}

define_entry_mapper!(ExpenseData, ExpenseMapper, ExpenseRecord, ExpenseId, "expense");
define_entry_mapper!(IncomeData, IncomeMapper, IncomeRecord, IncomeId, "income");

/// Flat stored form of a transfer; amount and fee share `currency`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferData {
    pub id: String,
    pub from_wallet_id: String,
    pub to_wallet_id: String,
    pub amount: i64,
    pub fee: i64,
    pub currency: String,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl AggregateData for TransferData {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransferMapper;

impl AggregateMapper for TransferMapper {
    type Domain = Transfer;
    type Data = TransferData;

    fn to_data(&self, transfer: &Transfer) -> TransferData {
        TransferData {
            id: transfer.id().key(),
            from_wallet_id: transfer.from_wallet_id().key(),
            to_wallet_id: transfer.to_wallet_id().key(),
            amount: transfer.amount().amount(),
            fee: transfer.fee().amount(),
            currency: transfer.amount().currency().to_string(),
            description: transfer.description().to_string(),
            date: transfer.date(),
            created_at: transfer.created_at(),
        }
    }

    fn to_domain(&self, data: TransferData) -> WalletResult<Transfer> {
        let id: TransferId = parse_id("transfer id", &data.id)?;
        let from: WalletId = parse_id("source wallet id", &data.from_wallet_id)?;
        let to: WalletId = parse_id("destination wallet id", &data.to_wallet_id)?;
        if from == to {
            return Err(WalletError::Mapping(format!(
                "transfer {} has the same source and destination",
                data.id
            )));
        }
        let amount = restore_money("transfer amount", data.amount, &data.currency)?;
        let fee = restore_money("transfer fee", data.fee, &data.currency)?;

        Ok(Transfer::restore(
            id,
            from,
            to,
            amount,
            fee,
            data.description,
            data.date,
            data.created_at,
        ))
    }
}
