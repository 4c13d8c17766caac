//! Wallet withdrawal entities.

mod withdrawal;

pub use withdrawal::{BankDestination, WithdrawalDecision, WithdrawalRequest, WithdrawalStatus};
