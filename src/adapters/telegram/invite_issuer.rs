//! Invite issuance against the Telegram Bot API.
//!
//! Mints invite links via `createChatInviteLink` with `member_limit=1`
//! so each credential admits exactly one member, optionally bounded by
//! an expiry. The bot must be an admin of the group with the invite
//! permission.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::foundation::{AccountId, GroupId, Timestamp};
use crate::ports::{AccessGrantIssuer, InviteCredential, IssuanceError};

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct CreateInviteLinkRequest {
    chat_id: i64,
    member_limit: u32,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expire_date: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Option<ChatInviteLink>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatInviteLink {
    invite_link: String,
    #[serde(default)]
    expire_date: Option<i64>,
}

/// `AccessGrantIssuer` over the Telegram Bot API.
pub struct TelegramInviteIssuer {
    http: reqwest::Client,
    bot_token: Secret<String>,

    /// Lifetime of minted links; `None` leaves them unbounded.
    link_ttl_secs: Option<u64>,
}

impl TelegramInviteIssuer {
    pub fn new(http: reqwest::Client, bot_token: Secret<String>, link_ttl_secs: Option<u64>) -> Self {
        Self {
            http,
            bot_token,
            link_ttl_secs,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            API_BASE,
            self.bot_token.expose_secret(),
            method
        )
    }
}

#[async_trait]
impl AccessGrantIssuer for TelegramInviteIssuer {
    async fn issue(
        &self,
        group: GroupId,
        account: AccountId,
    ) -> Result<InviteCredential, IssuanceError> {
        let request = CreateInviteLinkRequest {
            chat_id: group.as_i64(),
            member_limit: 1,
            name: format!("member-{}", account),
            expire_date: self
                .link_ttl_secs
                .map(|ttl| Timestamp::now().plus_secs(ttl).as_unix_secs()),
        };

        let response = self
            .http
            .post(self.method_url("createChatInviteLink"))
            .json(&request)
            .send()
            .await
            .map_err(|e| IssuanceError::Transport(e.to_string()))?;

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| IssuanceError::Transport(e.to_string()))?;

        if !body.ok {
            return Err(IssuanceError::Provider(
                body.description
                    .unwrap_or_else(|| "unknown Bot API error".to_string()),
            ));
        }
        let link = body.result.ok_or_else(|| {
            IssuanceError::Provider("ok response without invite link".to_string())
        })?;

        debug!(account = %account, group = %group, "minted invite link");
        Ok(InviteCredential {
            link: link.invite_link,
            expires_at: link.expire_date.map(Timestamp::from_unix_secs),
        })
    }
}
