//! Operator authorization policy.
//!
//! One configured operator account may make payment and withdrawal
//! decisions. Commands from anyone else are acknowledged but do
//! nothing, so probing the admin surface leaks no information.

use tracing::warn;

use crate::domain::foundation::AccountId;

/// Decides whether a caller may use operator commands.
#[derive(Debug, Clone, Copy)]
pub struct OperatorPolicy {
    operator: AccountId,
}

impl OperatorPolicy {
    pub fn new(operator: AccountId) -> Self {
        Self { operator }
    }

    /// True if the caller is the configured operator.
    pub fn is_operator(&self, caller: AccountId) -> bool {
        let allowed = caller == self.operator;
        if !allowed {
            warn!(caller = %caller, "non-operator attempted an admin command");
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_is_recognized() {
        let policy = OperatorPolicy::new(AccountId::new(777).unwrap());
        assert!(policy.is_operator(AccountId::new(777).unwrap()));
    }

    #[test]
    fn anyone_else_is_denied() {
        let policy = OperatorPolicy::new(AccountId::new(777).unwrap());
        assert!(!policy.is_operator(AccountId::new(778).unwrap()));
    }
}
