//! Verification error types for payment webhooks.

use thiserror::Error;

/// Errors that occur while authenticating and parsing a webhook delivery.
///
/// All variants are surfaced to the caller as a rejected request; a
/// delivery failing verification never reaches the grant workflow.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The signature header was absent.
    #[error("Missing signature header")]
    MissingSignature,

    /// The supplied signature did not match the computed digest.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The body failed to parse into the expected schema after the
    /// signature was accepted, or carried an implausible account id.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_signature_displays_correctly() {
        assert_eq!(
            format!("{}", VerificationError::MissingSignature),
            "Missing signature header"
        );
    }

    #[test]
    fn malformed_payload_displays_reason() {
        let err = VerificationError::MalformedPayload("not json".to_string());
        assert_eq!(format!("{}", err), "Malformed payload: not json");
    }
}
