//! Payment webhook signature verification.
//!
//! Implements verification of provider webhook deliveries using
//! HMAC-SHA256 over the raw request body, compared in constant time.
//! Verification always precedes parsing: an unauthenticated body is
//! never deserialized.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::VerificationError;
use super::event::{PaymentConfirmed, WebhookOutcome};
use super::link::parse_correlation_token;

/// Statuses the provider reports for a completed payment. Matched
/// case-insensitively; anything else is a non-terminal lifecycle
/// stage and is ignored.
const SUCCESS_STATUSES: &[&str] = &["successful", "success", "completed"];

/// Relevant fields of the provider's webhook envelope.
#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    status: String,
    tx_ref: Option<String>,
    id: Option<serde_json::Value>,
}

/// Verifier for payment provider webhook deliveries.
pub struct PaymentWebhookVerifier {
    /// Shared secret configured with the provider dashboard.
    secret: Secret<String>,

    /// Prefix of the correlation token embedded in `tx_ref`.
    tx_ref_prefix: String,
}

impl PaymentWebhookVerifier {
    pub fn new(secret: Secret<String>, tx_ref_prefix: impl Into<String>) -> Self {
        Self {
            secret,
            tx_ref_prefix: tx_ref_prefix.into(),
        }
    }

    /// Verifies a webhook delivery and extracts the payment event.
    ///
    /// # Verification Steps
    ///
    /// 1. Require the signature header
    /// 2. Compute HMAC-SHA256 over the raw body
    /// 3. Compare signatures using constant-time comparison
    /// 4. Parse the JSON payload and inspect the payment status
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - No signature header was supplied
    /// - `InvalidSignature` - The signature did not match the body
    /// - `MalformedPayload` - The authenticated body failed to parse,
    ///   or a successful payment carried no usable correlation token
    pub fn verify(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, VerificationError> {
        let signature = signature.ok_or(VerificationError::MissingSignature)?;

        let supplied =
            hex::decode(signature.trim()).map_err(|_| VerificationError::InvalidSignature)?;
        let expected = self.compute_signature(body);

        if !constant_time_compare(&expected, &supplied) {
            return Err(VerificationError::InvalidSignature);
        }

        let envelope: WebhookEnvelope = serde_json::from_slice(body)
            .map_err(|e| VerificationError::MalformedPayload(e.to_string()))?;

        if !is_success_status(&envelope.data.status) {
            return Ok(WebhookOutcome::Ignored);
        }

        let tx_ref = envelope.data.tx_ref.as_deref().ok_or_else(|| {
            VerificationError::MalformedPayload("successful payment without tx_ref".to_string())
        })?;
        let account = parse_correlation_token(tx_ref, &self.tx_ref_prefix)
            .map_err(|e| VerificationError::MalformedPayload(e.to_string()))?;

        // Prefer the provider's transaction id as the external
        // reference; fall back to the tx_ref we minted ourselves.
        let external_ref = match &envelope.data.id {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => tx_ref.to_string(),
        };

        Ok(WebhookOutcome::Confirmed(PaymentConfirmed {
            account,
            external_ref,
        }))
    }

    /// Computes the HMAC-SHA256 digest over the raw body.
    fn compute_signature(&self, body: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(body);
        mac.finalize().into_bytes().to_vec()
    }
}

fn is_success_status(status: &str) -> bool {
    SUCCESS_STATUSES
        .iter()
        .any(|s| status.eq_ignore_ascii_case(s))
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak information about the
/// expected signature.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex-encoded HMAC-SHA256 for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, body: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
