//! Adapters - implementations of the ports.
//!
//! `memory` holds the in-memory repositories the service ships with,
//! `telegram` talks to the chat platform's Bot API, and `http` is the
//! inbound axum surface.

pub mod http;
pub mod memory;
pub mod telegram;
