//! Withdrawal repository port.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, Amount, DomainError, WithdrawalId};
use crate::domain::wallet::{BankDestination, WithdrawalRequest};

/// Repository interface for withdrawal request persistence.
#[async_trait]
pub trait WithdrawalRepository: Send + Sync {
    /// Creates a new pending request, assigning the next sequential id.
    async fn insert(
        &self,
        account: AccountId,
        amount: Amount,
        destination: BankDestination,
    ) -> Result<WithdrawalRequest, DomainError>;

    /// Finds a request by its id.
    async fn find_by_id(&self, id: WithdrawalId)
        -> Result<Option<WithdrawalRequest>, DomainError>;

    /// Persists changes to an existing request.
    async fn update(&self, request: &WithdrawalRequest) -> Result<(), DomainError>;

    /// Lists requests still awaiting an operator decision.
    async fn list_pending(&self) -> Result<Vec<WithdrawalRequest>, DomainError>;
}
