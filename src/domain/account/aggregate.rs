//! Account aggregate entity.
//!
//! One record per payer, created lazily on first interaction. All
//! mutation goes through the grant workflow, which serializes access
//! per account.
//!
//! # Design Decisions
//!
//! - **Money in minor units**: wallet balances are `Amount`s, never floats
//! - **Forward-only status**: `Pending -> Approved | Rejected`, both terminal
//! - **Idempotency markers on the record**: `referral_bonus_fired`,
//!   `used_coupon` and the invite fields make retried approvals safe

use crate::domain::foundation::{
    AccountId, Amount, DomainError, ErrorCode, StateMachine, Timestamp,
};
use serde::{Deserialize, Serialize};

use super::PaymentStatus;

/// Where a payment decision came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// Verified card-payment webhook, carrying the provider's
    /// transaction reference.
    Webhook { external_ref: String },

    /// Operator command after reviewing a bank-transfer receipt.
    AdminCommand,
}

/// Account aggregate - one payer's authoritative state.
///
/// # Invariants
///
/// - `wallet_balance` is never negative (enforced by `Amount`)
/// - `payment_status` only moves forward
/// - `referral_bonus_fired` is set at most once, under the approval lock
/// - `invite_link` is set at most once per approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Platform identifier of the payer.
    pub id: AccountId,

    /// Current position in the payment lifecycle.
    pub payment_status: PaymentStatus,

    /// Referral wallet balance in minor units.
    pub wallet_balance: Amount,

    /// Account that referred this payer, if any.
    pub referred_by: Option<AccountId>,

    /// Set once the referrer's bonus for this account has been credited.
    pub referral_bonus_fired: bool,

    /// Set when this account's coupon was consumed at approval time.
    pub used_coupon: bool,

    /// True while the account is approved but its invite has not been
    /// minted yet (issuance failed or timed out; a retry resumes here).
    pub invite_pending: bool,

    /// The single-use invite link, once issuance succeeded.
    pub invite_link: Option<String>,

    /// How the terminal decision was reached.
    pub decided_via: Option<DecisionSource>,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When the record was last updated.
    pub updated_at: Timestamp,
}

impl Account {
    /// Creates a fresh pending account.
    pub fn new(id: AccountId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            payment_status: PaymentStatus::Pending,
            wallet_balance: Amount::ZERO,
            referred_by: None,
            referral_bonus_fired: false,
            used_coupon: false,
            invite_pending: false,
            invite_link: None,
            decided_via: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a fresh pending account with a recorded referrer.
    pub fn with_referrer(id: AccountId, referred_by: AccountId) -> Self {
        let mut account = Self::new(id);
        account.referred_by = Some(referred_by);
        account
    }

    /// Moves the account to `Approved` and records the decision source.
    ///
    /// Side-effect markers (`used_coupon`, `referral_bonus_fired`) are
    /// set by the workflow before this transition is persisted, so all
    /// of them land in the same durable step.
    pub fn approve(&mut self, source: DecisionSource) -> Result<(), DomainError> {
        self.transition_to(PaymentStatus::Approved)?;
        self.decided_via = Some(source);
        self.invite_pending = true;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Moves the account to `Rejected`. No side effects.
    pub fn reject(&mut self, source: DecisionSource) -> Result<(), DomainError> {
        self.transition_to(PaymentStatus::Rejected)?;
        self.decided_via = Some(source);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records the minted invite link and clears the pending flag.
    pub fn complete_invite(&mut self, link: String) {
        self.invite_link = Some(link);
        self.invite_pending = false;
        self.updated_at = Timestamp::now();
    }

    /// Marks the account's coupon as having been consumed at approval.
    pub fn mark_coupon_used(&mut self) {
        self.used_coupon = true;
        self.updated_at = Timestamp::now();
    }

    /// Marks the referral bonus for this account as fired.
    pub fn mark_referral_fired(&mut self) {
        self.referral_bonus_fired = true;
        self.updated_at = Timestamp::now();
    }

    /// Credits the wallet.
    pub fn credit(&mut self, amount: Amount) {
        self.wallet_balance = self.wallet_balance.plus(amount);
        self.updated_at = Timestamp::now();
    }

    /// Debits the wallet, failing if the balance does not cover it.
    pub fn debit(&mut self, amount: Amount) -> Result<(), DomainError> {
        self.wallet_balance = self.wallet_balance.checked_sub(amount).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                format!(
                    "Cannot debit {} from balance {}",
                    amount, self.wallet_balance
                ),
            )
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// True if the approval finished including credential issuance.
    pub fn is_fully_approved(&self) -> bool {
        self.payment_status.is_approved() && !self.invite_pending
    }

    /// Transition to a new payment status using the state machine.
    fn transition_to(&mut self, target: PaymentStatus) -> Result<(), DomainError> {
        self.payment_status = self.payment_status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition account {} from {:?} to {:?}",
                    self.id, self.payment_status, target
                ),
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account_id() -> AccountId {
        AccountId::new(12345).unwrap()
    }

    fn amount(minor: i64) -> Amount {
        Amount::from_minor(minor).unwrap()
    }

    // Construction tests

    #[test]
    fn new_account_starts_pending_with_empty_wallet() {
        let account = Account::new(test_account_id());

        assert_eq!(account.payment_status, PaymentStatus::Pending);
        assert_eq!(account.wallet_balance, Amount::ZERO);
        assert!(account.referred_by.is_none());
        assert!(!account.referral_bonus_fired);
        assert!(!account.used_coupon);
        assert!(account.invite_link.is_none());
    }

    #[test]
    fn with_referrer_records_the_referrer() {
        let referrer = AccountId::new(99).unwrap();
        let account = Account::with_referrer(test_account_id(), referrer);

        assert_eq!(account.referred_by, Some(referrer));
        assert!(!account.referral_bonus_fired);
    }

    // Lifecycle tests

    #[test]
    fn approve_sets_status_and_invite_pending() {
        let mut account = Account::new(test_account_id());

        account.approve(DecisionSource::AdminCommand).unwrap();

        assert_eq!(account.payment_status, PaymentStatus::Approved);
        assert!(account.invite_pending);
        assert!(!account.is_fully_approved());
    }

    #[test]
    fn complete_invite_clears_pending_flag() {
        let mut account = Account::new(test_account_id());
        account.approve(DecisionSource::AdminCommand).unwrap();

        account.complete_invite("https://t.me/+abc123".to_string());

        assert!(account.is_fully_approved());
        assert_eq!(account.invite_link.as_deref(), Some("https://t.me/+abc123"));
    }

    #[test]
    fn reject_is_terminal() {
        let mut account = Account::new(test_account_id());
        account.reject(DecisionSource::AdminCommand).unwrap();

        assert_eq!(account.payment_status, PaymentStatus::Rejected);
        assert!(account.approve(DecisionSource::AdminCommand).is_err());
    }

    #[test]
    fn approve_twice_fails() {
        let mut account = Account::new(test_account_id());
        account
            .approve(DecisionSource::Webhook {
                external_ref: "tx-1".to_string(),
            })
            .unwrap();

        assert!(account.approve(DecisionSource::AdminCommand).is_err());
    }

    // Wallet tests

    #[test]
    fn credit_increases_balance() {
        let mut account = Account::new(test_account_id());
        account.credit(amount(500));
        assert_eq!(account.wallet_balance, amount(500));
    }

    #[test]
    fn debit_within_balance_succeeds() {
        let mut account = Account::new(test_account_id());
        account.credit(amount(500));

        account.debit(amount(300)).unwrap();

        assert_eq!(account.wallet_balance, amount(200));
    }

    #[test]
    fn debit_beyond_balance_fails_and_leaves_balance_unchanged() {
        let mut account = Account::new(test_account_id());
        account.credit(amount(100));

        let result = account.debit(amount(150));

        assert!(result.is_err());
        assert_eq!(account.wallet_balance, amount(100));
    }
}
