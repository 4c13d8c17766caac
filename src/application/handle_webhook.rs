//! Payment webhook handling.
//!
//! Glue between the verifier and the grant workflow: authenticate the
//! delivery, then apply an approval for the confirmed account.
//! Verification failures never reach the workflow.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::{Decision, GrantWorkflow, TransitionError, TransitionOutcome};
use crate::domain::account::DecisionSource;
use crate::domain::payment::{PaymentWebhookVerifier, VerificationError, WebhookOutcome};

/// Errors from processing a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookHandlingError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Verifies webhook deliveries and feeds confirmations to the workflow.
pub struct PaymentWebhookHandler {
    verifier: PaymentWebhookVerifier,
    workflow: Arc<GrantWorkflow>,
}

impl PaymentWebhookHandler {
    pub fn new(verifier: PaymentWebhookVerifier, workflow: Arc<GrantWorkflow>) -> Self {
        Self { verifier, workflow }
    }

    /// Processes one raw delivery.
    ///
    /// Returns `None` for authentic deliveries that carry no terminal
    /// success event; the provider still gets a 200 for those.
    pub async fn handle(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<Option<TransitionOutcome>, WebhookHandlingError> {
        let confirmed = match self.verifier.verify(body, signature)? {
            WebhookOutcome::Confirmed(event) => event,
            WebhookOutcome::Ignored => {
                info!("ignoring non-terminal payment event");
                return Ok(None);
            }
        };

        info!(account = %confirmed.account, external_ref = %confirmed.external_ref, "payment confirmed");
        let outcome = self
            .workflow
            .apply(
                confirmed.account,
                Decision::Approve,
                DecisionSource::Webhook {
                    external_ref: confirmed.external_ref,
                },
            )
            .await?;

        Ok(Some(outcome))
    }
}
