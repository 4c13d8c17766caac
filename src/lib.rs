//! Groupgate - Access-grant workflow for a paid membership group.
//!
//! Confirmed payments (card webhook or manually reviewed bank transfer)
//! grant a single-use, time-bounded invite link to a restricted group,
//! with a bounded discount-coupon pool, referral wallet credits, and an
//! operator-reviewed withdrawal queue.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
