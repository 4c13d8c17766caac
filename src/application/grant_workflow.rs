//! The access-grant workflow - the account state machine.
//!
//! `apply` is the single entry point for payment decisions, whether
//! they arrive from a verified webhook or an operator command. It runs
//! under the account's lock, so duplicate deliveries and concurrent
//! operator actions serialize; a decision landing second sees a
//! terminal account and becomes an idempotent `AlreadyDecided`.
//!
//! When an approval can credit a referrer, the referrer's lock is held
//! too, so the credit cannot interleave with a withdrawal on the same
//! wallet. Locks are always taken in ascending account-id order, which
//! keeps mutually-referred payers from deadlocking each other.
//!
//! # Approval ordering
//!
//! 1. Consume the account's live coupon, if any (`used_coupon` marker)
//! 2. Credit the referral bonus (`referral_bonus_fired` marker)
//! 3. Persist `Approved` + `invite_pending` + all markers in one step
//! 4. Mint the invite credential, bounded by the issuance timeout
//! 5. Persist the link and clear `invite_pending`
//!
//! If step 4 or 5 fails the account stays `Approved` with
//! `invite_pending` set; re-applying the decision resumes at step 4
//! without repeating steps 1-3.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::{
    AccountLockRegistry, CouponAllocator, CouponError, ReferralCredit, ReferralLedger,
};
use crate::domain::account::{Account, AccountEvent, DecisionSource};
use crate::domain::coupon::Coupon;
use crate::domain::foundation::{AccountId, DomainError, GroupId, StateMachine, Timestamp};
use crate::ports::{AccessGrantIssuer, AccountRepository, InviteCredential, IssuanceError};

/// A payment verdict to apply to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// What applying a decision did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The account is approved and holds a valid invite credential.
    Approved {
        invite: InviteCredential,
        referral_credit: Option<ReferralCredit>,
        events: Vec<AccountEvent>,
    },

    /// The account was rejected. No side effects fired.
    Rejected { events: Vec<AccountEvent> },

    /// The account was already terminal; nothing happened.
    AlreadyDecided,
}

/// Errors from applying a decision.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The approval is durable but the invite was not minted. The
    /// caller should redeliver; the retry resumes issuance only.
    #[error("Account {account} approved but invite issuance failed: {reason}")]
    PartialFailure {
        account: AccountId,
        #[source]
        reason: IssuanceError,
    },

    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl From<CouponError> for TransitionError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::Storage(e) => TransitionError::Storage(e),
            // Pool exhaustion cannot happen here: consuming never
            // allocates. Treated as an internal fault if it does.
            CouponError::PoolExhausted { .. } => {
                TransitionError::Storage(DomainError::storage("unexpected pool error"))
            }
        }
    }
}

/// Applies payment decisions to accounts.
pub struct GrantWorkflow {
    accounts: Arc<dyn AccountRepository>,
    coupons: Arc<CouponAllocator>,
    referrals: Arc<ReferralLedger>,
    issuer: Arc<dyn AccessGrantIssuer>,
    locks: Arc<AccountLockRegistry>,
    group: GroupId,
    invite_timeout: Duration,
}

impl GrantWorkflow {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        coupons: Arc<CouponAllocator>,
        referrals: Arc<ReferralLedger>,
        issuer: Arc<dyn AccessGrantIssuer>,
        locks: Arc<AccountLockRegistry>,
        group: GroupId,
        invite_timeout: Duration,
    ) -> Self {
        Self {
            accounts,
            coupons,
            referrals,
            issuer,
            locks,
            group,
            invite_timeout,
        }
    }

    /// Applies a decision to an account, creating the record lazily.
    pub async fn apply(
        &self,
        account_id: AccountId,
        decision: Decision,
        source: DecisionSource,
    ) -> Result<TransitionOutcome, TransitionError> {
        let lock_ids = self.lock_order(account_id).await?;
        let mut locks = Vec::with_capacity(lock_ids.len());
        for id in &lock_ids {
            locks.push(self.locks.lock_for(*id).await);
        }
        let mut guards = Vec::with_capacity(locks.len());
        for lock in &locks {
            guards.push(lock.lock().await);
        }

        let mut account = match self.accounts.find_by_id(account_id).await? {
            Some(account) => account,
            None => {
                let account = Account::new(account_id);
                self.accounts.save(&account).await?;
                account
            }
        };

        if account.payment_status.is_terminal() {
            // A stranded approval resumes issuance; anything else is a
            // duplicate and must not repeat side effects.
            if account.invite_pending && decision == Decision::Approve {
                info!(account = %account_id, "resuming stranded invite issuance");
                let invite = self.issue_and_persist(&mut account).await?;
                let events = vec![AccountEvent::InviteIssued {
                    account: account_id,
                    link: invite.link.clone(),
                    occurred_at: Timestamp::now(),
                }];
                return Ok(TransitionOutcome::Approved {
                    invite,
                    referral_credit: None,
                    events,
                });
            }
            info!(account = %account_id, status = ?account.payment_status, "decision already made");
            return Ok(TransitionOutcome::AlreadyDecided);
        }

        match decision {
            Decision::Reject => self.reject(&mut account, source).await,
            Decision::Approve => self.approve(&mut account, source).await,
        }
    }

    async fn reject(
        &self,
        account: &mut Account,
        source: DecisionSource,
    ) -> Result<TransitionOutcome, TransitionError> {
        account.reject(source).map_err(TransitionError::Storage)?;
        self.accounts.update(account).await?;
        info!(account = %account.id, "payment rejected");

        Ok(TransitionOutcome::Rejected {
            events: vec![AccountEvent::Rejected {
                account: account.id,
                occurred_at: Timestamp::now(),
            }],
        })
    }

    async fn approve(
        &self,
        account: &mut Account,
        source: DecisionSource,
    ) -> Result<TransitionOutcome, TransitionError> {
        let mut events = Vec::new();
        let now = Timestamp::now();

        // 1. Coupon consumption.
        if self.coupons.mark_consumed(account.id, now).await? {
            account.mark_coupon_used();
            events.push(AccountEvent::CouponConsumed {
                account: account.id,
                code: Coupon::code_for(account.id),
                occurred_at: now,
            });
        }

        // 2. Referral bonus. The referrer's wallet is credited durably
        // here; the fired marker lands with the approval below.
        let referral_credit = self.referrals.on_approved(account).await?;
        if let Some(credit) = referral_credit {
            events.push(AccountEvent::ReferralCredited {
                referrer: credit.referrer,
                referred: account.id,
                amount: credit.amount,
                occurred_at: now,
            });
        }

        // 3. Status, decision source and all markers in one durable step.
        account.approve(source.clone()).map_err(TransitionError::Storage)?;
        self.accounts.update(account).await?;
        info!(account = %account.id, source = ?source, "payment approved");
        events.push(AccountEvent::Approved {
            account: account.id,
            source,
            occurred_at: now,
        });

        // 4-5. Credential issuance, resumable on failure.
        let invite = self.issue_and_persist(account).await?;
        events.push(AccountEvent::InviteIssued {
            account: account.id,
            link: invite.link.clone(),
            occurred_at: Timestamp::now(),
        });

        Ok(TransitionOutcome::Approved {
            invite,
            referral_credit,
            events,
        })
    }

    /// Accounts whose locks this decision must hold: the payer, plus
    /// the referrer when an approval could still credit their wallet.
    ///
    /// Sorted ascending so two decisions always contend for locks in
    /// the same order; without this, mutually-referred payers approving
    /// concurrently would each hold their own lock while waiting for
    /// the other's. `referred_by` is fixed at record creation, so the
    /// unlocked read here cannot go stale.
    async fn lock_order(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<AccountId>, TransitionError> {
        let mut ids = vec![account_id];
        if let Some(account) = self.accounts.find_by_id(account_id).await? {
            if let Some(referrer) = account.referred_by {
                if !account.referral_bonus_fired && referrer != account_id {
                    ids.push(referrer);
                    ids.sort();
                }
            }
        }
        Ok(ids)
    }

    /// Mints the invite under the configured deadline and records it.
    ///
    /// On any failure the account keeps `invite_pending`, so the next
    /// `apply` retries issuance without repeating approval side
    /// effects.
    async fn issue_and_persist(
        &self,
        account: &mut Account,
    ) -> Result<InviteCredential, TransitionError> {
        let issued = tokio::time::timeout(
            self.invite_timeout,
            self.issuer.issue(self.group, account.id),
        )
        .await;

        let invite = match issued {
            Ok(Ok(invite)) => invite,
            Ok(Err(reason)) => {
                error!(account = %account.id, error = %reason, "invite issuance failed");
                return Err(TransitionError::PartialFailure {
                    account: account.id,
                    reason,
                });
            }
            Err(_) => {
                warn!(account = %account.id, "invite issuance timed out");
                return Err(TransitionError::PartialFailure {
                    account: account.id,
                    reason: IssuanceError::Timeout,
                });
            }
        };

        account.complete_invite(invite.link.clone());
        self.accounts.update(account).await?;
        Ok(invite)
    }
}
