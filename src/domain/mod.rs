//! Domain layer - entities, value objects, and pure business rules.

pub mod account;
pub mod coupon;
pub mod foundation;
pub mod payment;
pub mod wallet;
