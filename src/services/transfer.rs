//! Transfer service
//!
//! A transfer changes two wallet aggregates, and each is persisted on its own.
//! The service runs it as a two-step saga under both wallet locks:
//!
//! 1. Both halves are applied in memory first, so every validation failure
//!    (missing wallet, currency, insufficient balance) is caught before
//!    anything is written.
//! 2. The source wallet is saved with `amount + fee` debited.
//! 3. The destination wallet is saved with `amount` credited and the transfer
//!    record attached.
//!
//! If step 3 fails, the source debit is reversed and saved again. When that
//! compensation also fails the caller gets [`WalletError::TransferIncomplete`]
//! carrying both errors, and the source wallet stays debited. A failed
//! destination save takes the attached transfer record with it, so a
//! compensated transfer leaves no trace in either wallet's history.

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::audit::EntityType;
use crate::error::{WalletError, WalletResult};
use crate::models::{Money, Transfer, Wallet, WalletId};
use crate::storage::Storage;

/// Service for transfers between wallets
pub struct TransferService<'a> {
    storage: &'a Storage,
}

impl<'a> TransferService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Move `amount` from one wallet to another; the source also pays `fee`
    pub fn transfer(
        &self,
        from: WalletId,
        to: WalletId,
        amount: Money,
        fee: Money,
        description: &str,
        date: NaiveDate,
    ) -> WalletResult<Transfer> {
        let transfer = Transfer::new(from, to, amount, fee, description, date)?;

        self.storage
            .locks
            .with_pair(from, to, || self.execute(transfer))
    }

    fn load(&self, id: WalletId) -> WalletResult<Wallet> {
        self.storage
            .wallets
            .find_by_id(id)?
            .ok_or_else(|| WalletError::wallet_not_found(id.key()))
    }

    fn execute(&self, transfer: Transfer) -> WalletResult<Transfer> {
        let mut source = self.load(transfer.from_wallet_id())?;
        let mut destination = self.load(transfer.to_wallet_id())?;

        source.process_outgoing_transfer(transfer.amount(), transfer.fee())?;
        destination.process_incoming_transfer(transfer.amount())?;
        destination.attach_transfer(transfer.clone());

        self.storage.wallets.save(&source)?;

        if let Err(cause) = self.storage.wallets.save(&destination) {
            warn!(
                transfer = %transfer.id(),
                source = %source.id(),
                error = %cause,
                "incoming half failed, reversing outgoing half"
            );
            return Err(self.compensate(source, &transfer, cause));
        }

        self.storage.log_create(
            EntityType::Transfer,
            transfer.id().key(),
            Some(transfer.description().to_string()).filter(|d| !d.is_empty()),
            &transfer,
        );
        info!(
            transfer = %transfer.id(),
            from = %source.id(),
            to = %destination.id(),
            amount = %transfer.amount(),
            fee = %transfer.fee(),
            "completed transfer"
        );
        Ok(transfer)
    }

    /// Undo the persisted outgoing half; returns the error to report
    fn compensate(
        &self,
        mut source: Wallet,
        transfer: &Transfer,
        cause: WalletError,
    ) -> WalletError {
        let reversed = source
            .reverse_outgoing_transfer(transfer.amount(), transfer.fee())
            .and_then(|()| self.storage.wallets.save(&source));

        match reversed {
            Ok(()) => {
                info!(transfer = %transfer.id(), source = %source.id(), "reversed outgoing half");
                cause
            }
            Err(compensation) => {
                error!(
                    transfer = %transfer.id(),
                    source = %source.id(),
                    error = %compensation,
                    "could not reverse outgoing half"
                );
                WalletError::TransferIncomplete {
                    cause: Box::new(cause),
                    compensation: Box::new(compensation),
                }
            }
        }
    }
}
