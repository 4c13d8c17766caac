//! Withdrawal requests against a referral wallet.
//!
//! A request debits the wallet synchronously when it is created, so a
//! visible request always has its debit applied. Rejection refunds the
//! amount exactly once; approval is terminal with no balance effect.

use crate::domain::foundation::{
    AccountId, Amount, StateMachine, Timestamp, ValidationError, WithdrawalId,
};
use serde::{Deserialize, Serialize};

/// Bank account the payout should go to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDestination {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

impl BankDestination {
    /// Validates that no field is empty.
    pub fn new(
        bank_name: impl Into<String>,
        account_number: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let dest = Self {
            bank_name: bank_name.into(),
            account_number: account_number.into(),
            account_name: account_name.into(),
        };
        if dest.bank_name.trim().is_empty() {
            return Err(ValidationError::empty_field("bank_name"));
        }
        if dest.account_number.trim().is_empty() {
            return Err(ValidationError::empty_field("account_number"));
        }
        if dest.account_name.trim().is_empty() {
            return Err(ValidationError::empty_field("account_name"));
        }
        Ok(dest)
    }
}

/// Lifecycle status of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Waiting for an operator decision. The debit is already applied.
    Pending,

    /// Paid out. Terminal; funds already left the wallet.
    Approved,

    /// Declined. Terminal; the amount was credited back exactly once.
    Rejected,
}

impl StateMachine for WithdrawalStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use WithdrawalStatus::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WithdrawalStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}

/// An operator's verdict on a pending withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalDecision {
    Approved,
    Rejected,
}

/// A user-initiated debit held for operator review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Sequential id assigned by the repository.
    pub id: WithdrawalId,

    /// Wallet owner.
    pub account: AccountId,

    /// Debited amount in minor units.
    pub amount: Amount,

    /// Payout destination.
    pub destination: BankDestination,

    /// Current status.
    pub status: WithdrawalStatus,

    /// When the request was created (and the debit applied).
    pub requested_at: Timestamp,

    /// When the operator decided, if they have.
    pub decided_at: Option<Timestamp>,
}

impl WithdrawalRequest {
    pub fn new(
        id: WithdrawalId,
        account: AccountId,
        amount: Amount,
        destination: BankDestination,
    ) -> Self {
        Self {
            id,
            account,
            amount,
            destination,
            status: WithdrawalStatus::Pending,
            requested_at: Timestamp::now(),
            decided_at: None,
        }
    }

    /// Applies the operator decision, failing if already decided.
    pub fn decide(&mut self, decision: WithdrawalDecision) -> Result<(), ValidationError> {
        let target = match decision {
            WithdrawalDecision::Approved => WithdrawalStatus::Approved,
            WithdrawalDecision::Rejected => WithdrawalStatus::Rejected,
        };
        self.status = self.status.transition_to(target)?;
        self.decided_at = Some(Timestamp::now());
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == WithdrawalStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination() -> BankDestination {
        BankDestination::new("Opay", "9039475752", "A. S. Attah").unwrap()
    }

    fn request() -> WithdrawalRequest {
        WithdrawalRequest::new(
            WithdrawalId::new(1),
            AccountId::new(12345).unwrap(),
            Amount::from_minor(5000).unwrap(),
            destination(),
        )
    }

    #[test]
    fn destination_rejects_empty_fields() {
        assert!(BankDestination::new("", "123", "name").is_err());
        assert!(BankDestination::new("bank", " ", "name").is_err());
        assert!(BankDestination::new("bank", "123", "").is_err());
    }

    #[test]
    fn new_request_is_pending() {
        let request = request();
        assert!(request.is_pending());
        assert!(request.decided_at.is_none());
    }

    #[test]
    fn pending_request_can_be_approved() {
        let mut request = request();
        request.decide(WithdrawalDecision::Approved).unwrap();
        assert_eq!(request.status, WithdrawalStatus::Approved);
        assert!(request.decided_at.is_some());
    }

    #[test]
    fn pending_request_can_be_rejected() {
        let mut request = request();
        request.decide(WithdrawalDecision::Rejected).unwrap();
        assert_eq!(request.status, WithdrawalStatus::Rejected);
    }

    #[test]
    fn decided_request_accepts_no_second_decision() {
        let mut request = request();
        request.decide(WithdrawalDecision::Approved).unwrap();

        assert!(request.decide(WithdrawalDecision::Approved).is_err());
        assert!(request.decide(WithdrawalDecision::Rejected).is_err());
    }

    #[test]
    fn terminal_statuses_have_no_transitions() {
        assert!(WithdrawalStatus::Approved.is_terminal());
        assert!(WithdrawalStatus::Rejected.is_terminal());
        assert!(!WithdrawalStatus::Pending.is_terminal());
    }
}
