//! Withdrawal request queue.
//!
//! Creating a request debits the wallet synchronously, under the
//! account's lock, before the request becomes visible. Rejection
//! refunds the amount exactly once; approval is terminal with no
//! further balance effect.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::AccountLockRegistry;
use crate::domain::foundation::{AccountId, Amount, DomainError, WithdrawalId};
use crate::domain::wallet::{
    BankDestination, WithdrawalDecision, WithdrawalRequest, WithdrawalStatus,
};
use crate::ports::{AccountRepository, WithdrawalRepository};

/// Errors from the withdrawal queue.
#[derive(Debug, Error)]
pub enum WithdrawalError {
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    #[error("Withdrawal {0} not found")]
    NotFound(WithdrawalId),

    #[error("Balance {available} does not cover requested {requested}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("Withdrawal amount must be positive")]
    InvalidAmount,

    #[error("Withdrawal {0} already decided")]
    AlreadyDecided(WithdrawalId),

    #[error(transparent)]
    Storage(#[from] DomainError),
}

/// Accepts withdrawal requests and applies operator decisions.
pub struct WithdrawalQueue {
    accounts: Arc<dyn AccountRepository>,
    withdrawals: Arc<dyn WithdrawalRepository>,
    locks: Arc<AccountLockRegistry>,
}

impl WithdrawalQueue {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        withdrawals: Arc<dyn WithdrawalRepository>,
        locks: Arc<AccountLockRegistry>,
    ) -> Self {
        Self {
            accounts,
            withdrawals,
            locks,
        }
    }

    /// Creates a pending request, debiting the wallet first.
    ///
    /// The debit lands before the request is inserted, so every
    /// visible request already has its funds held. Concurrent requests
    /// from the same account serialize on the account lock and cannot
    /// jointly overdraw the wallet.
    pub async fn request(
        &self,
        account_id: AccountId,
        amount: Amount,
        destination: BankDestination,
    ) -> Result<WithdrawalRequest, WithdrawalError> {
        if amount.is_zero() {
            return Err(WithdrawalError::InvalidAmount);
        }

        let lock = self.locks.lock_for(account_id).await;
        let _guard = lock.lock().await;

        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(WithdrawalError::AccountNotFound(account_id))?;

        let available = account.wallet_balance;
        account
            .debit(amount)
            .map_err(|_| WithdrawalError::InsufficientFunds {
                requested: amount,
                available,
            })?;
        self.accounts.update(&account).await?;

        match self
            .withdrawals
            .insert(account_id, amount, destination)
            .await
        {
            Ok(request) => {
                info!(
                    account = %account_id,
                    withdrawal = %request.id,
                    amount = %amount,
                    "withdrawal requested"
                );
                Ok(request)
            }
            Err(e) => {
                // Put the held funds back before surfacing the failure.
                account.credit(amount);
                self.accounts.update(&account).await?;
                warn!(account = %account_id, error = %e, "withdrawal insert failed, debit reversed");
                Err(e.into())
            }
        }
    }

    /// Applies an operator decision to a pending request.
    ///
    /// Rejection credits the amount back; the refund fires exactly
    /// once because a decided request accepts no further decisions.
    pub async fn decide(
        &self,
        id: WithdrawalId,
        decision: WithdrawalDecision,
    ) -> Result<WithdrawalRequest, WithdrawalError> {
        let mut request = self
            .withdrawals
            .find_by_id(id)
            .await?
            .ok_or(WithdrawalError::NotFound(id))?;

        let lock = self.locks.lock_for(request.account).await;
        let _guard = lock.lock().await;

        // Reload under the lock; another decision may have won the race.
        request = self
            .withdrawals
            .find_by_id(id)
            .await?
            .ok_or(WithdrawalError::NotFound(id))?;

        request
            .decide(decision)
            .map_err(|_| WithdrawalError::AlreadyDecided(id))?;
        self.withdrawals.update(&request).await?;

        if request.status == WithdrawalStatus::Rejected {
            let mut account = self
                .accounts
                .find_by_id(request.account)
                .await?
                .ok_or(WithdrawalError::AccountNotFound(request.account))?;
            account.credit(request.amount);
            self.accounts.update(&account).await?;
            info!(
                account = %request.account,
                withdrawal = %id,
                amount = %request.amount,
                "withdrawal rejected, amount refunded"
            );
        } else {
            info!(account = %request.account, withdrawal = %id, "withdrawal approved");
        }

        Ok(request)
    }

    /// Lists requests awaiting a decision.
    pub async fn pending(&self) -> Result<Vec<WithdrawalRequest>, WithdrawalError> {
        Ok(self.withdrawals.list_pending().await?)
    }
}
