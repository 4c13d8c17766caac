//! Per-account async locks.
//!
//! Every state-changing operation on one payer runs under that payer's
//! lock, so concurrent webhook deliveries and operator commands for
//! the same account serialize instead of racing.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::foundation::AccountId;

/// Registry handing out one async mutex per account id.
///
/// Locks are created on first use and never reclaimed; the account
/// population here is small and bounded by group size.
#[derive(Default)]
pub struct AccountLockRegistry {
    locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for an account, creating it if needed.
    ///
    /// Callers hold the returned `Arc` and lock it themselves; the
    /// registry's own mutex is only held for the map lookup.
    pub async fn lock_for(&self, account: AccountId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(account)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_account_gets_same_lock() {
        let registry = AccountLockRegistry::new();
        let id = AccountId::new(1).unwrap();

        let a = registry.lock_for(id).await;
        let b = registry.lock_for(id).await;

        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn different_accounts_get_different_locks() {
        let registry = AccountLockRegistry::new();

        let a = registry.lock_for(AccountId::new(1).unwrap()).await;
        let b = registry.lock_for(AccountId::new(2).unwrap()).await;

        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn lock_serializes_critical_sections() {
        let registry = Arc::new(AccountLockRegistry::new());
        let id = AccountId::new(7).unwrap();
        let counter = Arc::new(Mutex::new(0u32));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                let lock = registry.lock_for(id).await;
                let _guard = lock.lock().await;
                let mut count = counter.lock().await;
                *count += 1;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*counter.lock().await, 16);
    }
}
