//! Payment status state machine.
//!
//! Transitions only move forward: a pending account is either approved
//! or rejected, and both outcomes are terminal. An operator re-opening
//! a rejected payer is a fresh manual flow, not a state transition.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Payment status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No confirmed payment yet. The only state that accepts decisions.
    Pending,

    /// Payment confirmed; invite issuance has started or completed.
    Approved,

    /// Payment rejected by the operator. Terminal.
    Rejected,
}

impl PaymentStatus {
    /// Returns true if this status grants entry to the group.
    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentStatus::Approved)
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}
