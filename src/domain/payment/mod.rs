//! Payment webhook verification and payment-link correlation.

mod errors;
mod event;
mod link;
mod verifier;

pub use errors::VerificationError;
pub use event::{PaymentConfirmed, WebhookOutcome};
pub use link::{parse_correlation_token, PaymentLinkBuilder};
pub use verifier::PaymentWebhookVerifier;
