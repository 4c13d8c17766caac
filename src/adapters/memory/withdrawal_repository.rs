//! In-memory withdrawal repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{AccountId, Amount, DomainError, ErrorCode, WithdrawalId};
use crate::domain::wallet::{BankDestination, WithdrawalRequest};
use crate::ports::WithdrawalRepository;

/// Withdrawal storage with sequential id assignment.
#[derive(Default)]
pub struct InMemoryWithdrawalRepository {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    requests: BTreeMap<WithdrawalId, WithdrawalRequest>,
    next_id: u64,
}

impl InMemoryWithdrawalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WithdrawalRepository for InMemoryWithdrawalRepository {
    async fn insert(
        &self,
        account: AccountId,
        amount: Amount,
        destination: BankDestination,
    ) -> Result<WithdrawalRequest, DomainError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let request =
            WithdrawalRequest::new(WithdrawalId::new(inner.next_id), account, amount, destination);
        inner.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(
        &self,
        id: WithdrawalId,
    ) -> Result<Option<WithdrawalRequest>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.requests.get(&id).cloned())
    }

    async fn update(&self, request: &WithdrawalRequest) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        if !inner.requests.contains_key(&request.id) {
            return Err(DomainError::new(
                ErrorCode::WithdrawalNotFound,
                format!("Withdrawal {} not found", request.id),
            ));
        }
        inner.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<WithdrawalRequest>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .requests
            .values()
            .filter(|r| r.is_pending())
            .cloned()
            .collect())
    }
}
