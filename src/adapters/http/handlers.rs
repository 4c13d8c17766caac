//! HTTP handlers wiring axum routes to the application services.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::error;

use crate::application::{
    CouponAllocator, CouponError, Decision, GrantWorkflow, OperatorPolicy, PaymentWebhookHandler,
    TransitionError, TransitionOutcome, WebhookHandlingError, WithdrawalError, WithdrawalQueue,
};
use crate::domain::account::DecisionSource;
use crate::domain::foundation::{AccountId, Amount, Timestamp};
use crate::domain::payment::{PaymentLinkBuilder, VerificationError};
use crate::domain::wallet::{BankDestination, WithdrawalDecision};
use crate::ports::AccountRepository;

use super::dto::{
    AccountView, AckResponse, AdminDecisionRequest, ClaimCouponRequest, ClaimCouponResponse,
    CouponView, CreateWithdrawalRequest, DecisionDto, DecisionResponse, ErrorResponse,
    PoolStatsResponse, WithdrawalDecisionRequest, WithdrawalResponse,
};

/// Signature header the payment provider sends with each delivery.
const SIGNATURE_HEADER: &str = "verif-hash";

/// Header carrying the caller's account id for operator commands.
const OPERATOR_HEADER: &str = "x-operator-id";

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub webhook: Arc<PaymentWebhookHandler>,
    pub workflow: Arc<GrantWorkflow>,
    pub coupons: Arc<CouponAllocator>,
    pub withdrawals: Arc<WithdrawalQueue>,
    pub accounts: Arc<dyn AccountRepository>,
    pub links: PaymentLinkBuilder,
    pub operator: OperatorPolicy,
}

impl AppState {
    /// Extracts and validates the operator header, if present.
    fn caller_is_operator(&self, headers: &HeaderMap) -> bool {
        headers
            .get(OPERATOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<AccountId>().ok())
            .map(|caller| self.operator.is_operator(caller))
            .unwrap_or(false)
    }
}

// ─── Webhook ────────────────────────────────────────────────────────

/// POST /webhooks/payment
///
/// 200 for anything syntactically accepted (including ignored
/// non-terminal events), 400 for verification failures, 500 for a
/// partial failure so the provider redelivers and the grant resumes.
pub async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    state.webhook.handle(&body, signature).await?;

    Ok(Json(AckResponse::ok()))
}

// ─── Admin decisions ────────────────────────────────────────────────

/// POST /admin/decisions
///
/// A non-operator caller gets a bare acknowledgement and nothing
/// happens; the admin surface leaks no information.
pub async fn handle_admin_decision(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AdminDecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.caller_is_operator(&headers) {
        return Ok(Json(DecisionResponse {
            status: "ok",
            outcome: "ignored",
            invite_link: None,
        }));
    }

    let account = AccountId::new(request.account_id).map_err(ApiError::validation)?;
    let decision = match request.decision {
        DecisionDto::Approve => Decision::Approve,
        DecisionDto::Reject => Decision::Reject,
    };

    let outcome = state
        .workflow
        .apply(account, decision, DecisionSource::AdminCommand)
        .await?;

    let response = match outcome {
        TransitionOutcome::Approved { invite, .. } => DecisionResponse {
            status: "ok",
            outcome: "approved",
            invite_link: Some(invite.link),
        },
        TransitionOutcome::Rejected { .. } => DecisionResponse {
            status: "ok",
            outcome: "rejected",
            invite_link: None,
        },
        TransitionOutcome::AlreadyDecided => DecisionResponse {
            status: "ok",
            outcome: "already_decided",
            invite_link: None,
        },
    };
    Ok(Json(response))
}

// ─── Coupons ────────────────────────────────────────────────────────

/// POST /coupons/claim
///
/// An exhausted pool is not an error: the caller falls back to full
/// price, so the response carries `"coupon": null`.
pub async fn claim_coupon(
    State(state): State<AppState>,
    Json(request): Json<ClaimCouponRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = AccountId::new(request.account_id).map_err(ApiError::validation)?;

    let coupon = match state.coupons.try_issue(account, Timestamp::now()).await {
        Ok(coupon) => Some(CouponView::from(coupon)),
        Err(CouponError::PoolExhausted { .. }) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ClaimCouponResponse { coupon }))
}

/// GET /coupons/stats (operator only)
pub async fn coupon_pool_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if !state.caller_is_operator(&headers) {
        return Err(ApiError::not_found("resource not found"));
    }

    let stats = state.coupons.pool_stats(Timestamp::now()).await?;
    Ok(Json(PoolStatsResponse {
        capacity: stats.capacity,
        live: stats.live,
        available: stats.available,
    }))
}

// ─── Withdrawals ────────────────────────────────────────────────────

/// POST /withdrawals
pub async fn create_withdrawal(
    State(state): State<AppState>,
    Json(request): Json<CreateWithdrawalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = AccountId::new(request.account_id).map_err(ApiError::validation)?;
    let amount = Amount::from_minor(request.amount_minor).map_err(ApiError::validation)?;
    let destination = BankDestination::new(
        request.bank_name,
        request.account_number,
        request.account_name,
    )
    .map_err(ApiError::validation)?;

    let created = state.withdrawals.request(account, amount, destination).await?;

    Ok((StatusCode::CREATED, Json(WithdrawalResponse::from(&created))))
}

/// POST /withdrawals/{id}/decision (operator only, silent no-op otherwise)
pub async fn decide_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(request): Json<WithdrawalDecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.caller_is_operator(&headers) {
        return Ok(Json(AckResponse::ok()).into_response());
    }

    let decision = match request.decision {
        DecisionDto::Approve => WithdrawalDecision::Approved,
        DecisionDto::Reject => WithdrawalDecision::Rejected,
    };

    let decided = state
        .withdrawals
        .decide(crate::domain::foundation::WithdrawalId::new(id), decision)
        .await?;

    Ok(Json(WithdrawalResponse::from(&decided)).into_response())
}

// ─── Accounts & liveness ────────────────────────────────────────────

/// GET /accounts/{id} - payment status view
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = AccountId::new(id).map_err(ApiError::validation)?;

    let account = state
        .accounts
        .find_by_id(account_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Account {} not found", account_id)))?;

    // A pending payer still needs their payment link.
    let payment_link = (account.payment_status == crate::domain::account::PaymentStatus::Pending)
        .then(|| state.links.link_for(account.id));

    Ok(Json(AccountView::new(&account, payment_link)))
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    Json(AckResponse::ok())
}

// ─── Error mapping ──────────────────────────────────────────────────

/// API error carrying the HTTP status and a JSON error body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(error, message),
        }
    }

    fn validation(err: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string())
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.body.error, message = %self.body.message, "request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}

impl From<WebhookHandlingError> for ApiError {
    fn from(err: WebhookHandlingError) -> Self {
        match err {
            WebhookHandlingError::Verification(e) => {
                let code = match e {
                    VerificationError::MissingSignature => "MISSING_SIGNATURE",
                    VerificationError::InvalidSignature => "INVALID_SIGNATURE",
                    VerificationError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
                };
                Self::new(StatusCode::BAD_REQUEST, code, e.to_string())
            }
            WebhookHandlingError::Transition(e) => e.into(),
        }
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        match err {
            // 500 tells the provider to redeliver; the retry resumes
            // credential issuance.
            TransitionError::PartialFailure { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "GRANT_INCOMPLETE",
                err.to_string(),
            ),
            TransitionError::Storage(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<CouponError> for ApiError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::PoolExhausted { .. } => {
                Self::new(StatusCode::CONFLICT, "POOL_EXHAUSTED", err.to_string())
            }
            CouponError::Storage(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<WithdrawalError> for ApiError {
    fn from(err: WithdrawalError) -> Self {
        match &err {
            WithdrawalError::InsufficientFunds { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_FUNDS",
                err.to_string(),
            ),
            WithdrawalError::InvalidAmount => Self::validation(err),
            WithdrawalError::AccountNotFound(_) | WithdrawalError::NotFound(_) => {
                Self::not_found(err.to_string())
            }
            WithdrawalError::AlreadyDecided(_) => {
                Self::new(StatusCode::CONFLICT, "ALREADY_DECIDED", err.to_string())
            }
            WithdrawalError::Storage(e) => Self::internal(e.to_string()),
        }
    }
}
