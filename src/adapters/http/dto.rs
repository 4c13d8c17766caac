//! Request/response DTOs for the HTTP surface.
//!
//! DTOs stay at the boundary: handlers translate them to and from
//! domain types, validating on the way in.

use serde::{Deserialize, Serialize};

use crate::domain::account::Account;
use crate::domain::coupon::Coupon;
use crate::domain::wallet::{WithdrawalRequest, WithdrawalStatus};

/// Generic acknowledgement body: `{"status":"ok"}`.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub status: &'static str,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Error body for rejected requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// POST /admin/decisions
#[derive(Debug, Deserialize)]
pub struct AdminDecisionRequest {
    pub account_id: i64,
    pub decision: DecisionDto,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionDto {
    Approve,
    Reject,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub status: &'static str,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_link: Option<String>,
}

/// POST /coupons/claim
#[derive(Debug, Deserialize)]
pub struct ClaimCouponRequest {
    pub account_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ClaimCouponResponse {
    pub coupon: Option<CouponView>,
}

#[derive(Debug, Serialize)]
pub struct CouponView {
    pub code: String,
    pub expires_at_unix: i64,
}

impl From<Coupon> for CouponView {
    fn from(coupon: Coupon) -> Self {
        Self {
            code: coupon.code,
            expires_at_unix: coupon.expires_at.as_unix_secs(),
        }
    }
}

/// GET /coupons/stats
#[derive(Debug, Serialize)]
pub struct PoolStatsResponse {
    pub capacity: u32,
    pub live: u32,
    pub available: u32,
}

/// POST /withdrawals
#[derive(Debug, Deserialize)]
pub struct CreateWithdrawalRequest {
    pub account_id: i64,
    pub amount_minor: i64,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

#[derive(Debug, Serialize)]
pub struct WithdrawalResponse {
    pub withdrawal_id: u64,
    pub status: WithdrawalStatusDto,
    pub amount_minor: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatusDto {
    Pending,
    Approved,
    Rejected,
}

impl From<WithdrawalStatus> for WithdrawalStatusDto {
    fn from(status: WithdrawalStatus) -> Self {
        match status {
            WithdrawalStatus::Pending => WithdrawalStatusDto::Pending,
            WithdrawalStatus::Approved => WithdrawalStatusDto::Approved,
            WithdrawalStatus::Rejected => WithdrawalStatusDto::Rejected,
        }
    }
}

impl From<&WithdrawalRequest> for WithdrawalResponse {
    fn from(request: &WithdrawalRequest) -> Self {
        Self {
            withdrawal_id: request.id.as_u64(),
            status: request.status.into(),
            amount_minor: request.amount.as_minor(),
        }
    }
}

/// POST /withdrawals/{id}/decision
#[derive(Debug, Deserialize)]
pub struct WithdrawalDecisionRequest {
    pub decision: DecisionDto,
}

/// GET /accounts/{id}
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub account_id: i64,
    pub payment_status: String,
    pub wallet_balance_minor: i64,
    pub used_coupon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_link: Option<String>,
    /// Hosted payment link, present while the account is still pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<String>,
}

impl AccountView {
    pub fn new(account: &Account, payment_link: Option<String>) -> Self {
        Self {
            account_id: account.id.as_i64(),
            payment_status: format!("{:?}", account.payment_status).to_lowercase(),
            wallet_balance_minor: account.wallet_balance.as_minor(),
            used_coupon: account.used_coupon,
            invite_link: account.invite_link.clone(),
            payment_link,
        }
    }
}
