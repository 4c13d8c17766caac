//! Axum router for the service.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    claim_coupon, coupon_pool_stats, create_withdrawal, decide_withdrawal, get_account,
    handle_admin_decision, handle_payment_webhook, healthz, AppState,
};

/// Builds the full API router.
///
/// # Routes
///
/// ## Provider-facing (signature verified, no auth)
/// - `POST /webhooks/payment`
///
/// ## Member-facing
/// - `POST /coupons/claim`
/// - `POST /withdrawals`
/// - `GET /accounts/{id}`
///
/// ## Operator (x-operator-id header)
/// - `POST /admin/decisions`
/// - `POST /withdrawals/{id}/decision`
/// - `GET /coupons/stats`
///
/// ## Infrastructure
/// - `GET /healthz`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/webhooks/payment", post(handle_payment_webhook))
        .route("/admin/decisions", post(handle_admin_decision))
        .route("/coupons/claim", post(claim_coupon))
        .route("/coupons/stats", get(coupon_pool_stats))
        .route("/withdrawals", post(create_withdrawal))
        .route("/withdrawals/:id/decision", post(decide_withdrawal))
        .route("/accounts/:id", get(get_account))
        .route("/healthz", get(healthz))
}
