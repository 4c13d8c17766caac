//! Access-grant issuer port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{AccountId, GroupId, Timestamp};

/// A single-use credential admitting one account into the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteCredential {
    /// The invite link handed to the member.
    pub link: String,

    /// When the link stops working, if the platform bounds it.
    pub expires_at: Option<Timestamp>,
}

/// Errors from the chat platform while minting an invite.
///
/// All variants are retryable: the caller keeps the grant resumable
/// and re-runs issuance on the next attempt.
#[derive(Debug, Error)]
pub enum IssuanceError {
    /// The platform did not answer within the configured deadline.
    #[error("Invite issuance timed out")]
    Timeout,

    /// The platform answered with an error.
    #[error("Platform rejected invite request: {0}")]
    Provider(String),

    /// The request never reached the platform.
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Interface to the chat platform that mints group invites.
///
/// Implementations must request a member-limited link so the
/// credential admits exactly one account.
#[async_trait]
pub trait AccessGrantIssuer: Send + Sync {
    /// Mints a fresh single-use invite into `group` for the account.
    async fn issue(
        &self,
        group: GroupId,
        account: AccountId,
    ) -> Result<InviteCredential, IssuanceError>;
}
