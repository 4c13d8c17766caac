//! Discount coupon entity.

mod coupon;

pub use coupon::Coupon;
