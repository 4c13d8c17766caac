//! Port interfaces (hexagonal architecture).
//!
//! Ports define the boundaries between the application core and the
//! outside world. Repositories abstract persistence; the invite issuer
//! abstracts the chat platform. Adapters implement these traits.

mod account_repository;
mod coupon_repository;
mod invite_issuer;
mod withdrawal_repository;

pub use account_repository::AccountRepository;
pub use coupon_repository::CouponRepository;
pub use invite_issuer::{AccessGrantIssuer, InviteCredential, IssuanceError};
pub use withdrawal_repository::WithdrawalRepository;
