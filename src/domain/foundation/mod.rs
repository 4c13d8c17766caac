//! Shared building blocks for the domain layer.

mod errors;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, GroupId, WithdrawalId};
pub use money::Amount;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
