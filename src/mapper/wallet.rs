//! Wallet record and mapper

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{parse_id, restore_money, AggregateMapper};
use crate::error::{WalletError, WalletResult};
use crate::models::{UserId, Wallet, WalletId, WalletType};
use crate::storage::AggregateData;

/// Flat stored form of a wallet's summary state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletData {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub wallet_type: String,
    pub balance_amount: i64,
    pub balance_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AggregateData for WalletData {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WalletMapper;

impl AggregateMapper for WalletMapper {
    type Domain = Wallet;
    type Data = WalletData;

    fn to_data(&self, wallet: &Wallet) -> WalletData {
        WalletData {
            id: wallet.id().key(),
            user_id: wallet.user_id().to_string(),
            name: wallet.name().to_string(),
            wallet_type: wallet.wallet_type().as_str().to_string(),
            balance_amount: wallet.balance().amount(),
            balance_currency: wallet.currency().to_string(),
            created_at: wallet.created_at(),
            updated_at: wallet.updated_at(),
        }
    }

    fn to_domain(&self, data: WalletData) -> WalletResult<Wallet> {
        let id: WalletId = parse_id("wallet id", &data.id)?;
        let wallet_type = WalletType::parse(&data.wallet_type).ok_or_else(|| {
            WalletError::Mapping(format!("unknown wallet type '{}'", data.wallet_type))
        })?;
        let user_id = UserId::new(data.user_id);
        if user_id.is_empty() {
            return Err(WalletError::Mapping(format!("wallet {} has no user", data.id)));
        }
        if data.name.trim().is_empty() {
            return Err(WalletError::Mapping(format!("wallet {} has no name", data.id)));
        }
        let balance = restore_money("balance", data.balance_amount, &data.balance_currency)?;

        Ok(Wallet::restore(
            id,
            user_id,
            data.name,
            wallet_type,
            balance,
            data.created_at,
            data.updated_at,
        ))
    }
}
