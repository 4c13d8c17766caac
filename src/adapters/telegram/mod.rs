//! Telegram Bot API adapter for invite issuance.

mod invite_issuer;

pub use invite_issuer::TelegramInviteIssuer;
