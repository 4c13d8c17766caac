//! In-memory repository adapters.
//!
//! The shipping persistence layer. State lives in `tokio::sync::RwLock`
//! maps; every method clones on the way out so callers never hold the
//! lock. Swapping in a database later means implementing the same port
//! traits against it.

mod account_repository;
mod coupon_repository;
mod withdrawal_repository;

pub use account_repository::InMemoryAccountRepository;
pub use coupon_repository::InMemoryCouponRepository;
pub use withdrawal_repository::InMemoryWithdrawalRepository;
