//! Application layer - orchestrating services.
//!
//! Each service wires domain rules to the ports. Concurrency control
//! lives here: per-account locks serialize every mutation of one
//! payer's record (decisions, wallet credits, withdrawals), and the
//! coupon pool gate serializes capacity checks.

mod account_locks;
mod coupon_allocator;
mod grant_workflow;
mod handle_webhook;
mod operator_policy;
mod referral_ledger;
mod withdrawal_queue;

pub use account_locks::AccountLockRegistry;
pub use coupon_allocator::{CouponAllocator, CouponError, PoolStats};
pub use grant_workflow::{Decision, GrantWorkflow, TransitionError, TransitionOutcome};
pub use handle_webhook::{PaymentWebhookHandler, WebhookHandlingError};
pub use operator_policy::OperatorPolicy;
pub use referral_ledger::{ReferralCredit, ReferralLedger};
pub use withdrawal_queue::{WithdrawalError, WithdrawalQueue};
