//! Account repository port.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError};

/// Repository interface for account persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persists a new account. Overwrites any existing record with the
    /// same id.
    async fn save(&self, account: &Account) -> Result<(), DomainError>;

    /// Finds an account by its id.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DomainError>;

    /// Persists changes to an existing account.
    ///
    /// Status and idempotency markers must land together; a partially
    /// applied update would let a retry repeat side effects.
    async fn update(&self, account: &Account) -> Result<(), DomainError>;
}
