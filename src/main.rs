//! Service entry point: config, tracing, wiring, serve.

use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use groupgate::adapters::http::{api_router, AppState};
use groupgate::adapters::memory::{
    InMemoryAccountRepository, InMemoryCouponRepository, InMemoryWithdrawalRepository,
};
use groupgate::adapters::telegram::TelegramInviteIssuer;
use groupgate::application::{
    AccountLockRegistry, CouponAllocator, GrantWorkflow, OperatorPolicy, PaymentWebhookHandler,
    ReferralLedger, WithdrawalQueue,
};
use groupgate::config::AppConfig;
use groupgate::domain::foundation::{AccountId, Amount, GroupId};
use groupgate::domain::payment::{PaymentLinkBuilder, PaymentWebhookVerifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let state = build_state(&config)?;

    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.server.socket_addr();
    info!(%addr, "groupgate listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let coupons_repo = Arc::new(InMemoryCouponRepository::new());
    let withdrawals_repo = Arc::new(InMemoryWithdrawalRepository::new());
    let locks = Arc::new(AccountLockRegistry::new());

    let allocator = Arc::new(CouponAllocator::new(
        coupons_repo,
        config.workflow.pool_size,
        config.workflow.coupon_ttl_secs,
    ));
    let referrals = Arc::new(ReferralLedger::new(
        accounts.clone(),
        Amount::from_minor(config.workflow.coupon_bonus_minor)?,
        Amount::from_minor(config.workflow.full_bonus_minor)?,
    ));
    let issuer = Arc::new(TelegramInviteIssuer::new(
        reqwest::Client::new(),
        config.telegram.bot_token.clone(),
        config.telegram.invite_link_ttl_secs,
    ));

    let workflow = Arc::new(GrantWorkflow::new(
        accounts.clone(),
        allocator.clone(),
        referrals,
        issuer,
        locks.clone(),
        GroupId::new(config.telegram.group_id),
        Duration::from_secs(config.workflow.invite_timeout_secs),
    ));

    let verifier = PaymentWebhookVerifier::new(
        config.payment.webhook_secret.clone(),
        config.payment.tx_ref_prefix.clone(),
    );
    let webhook = Arc::new(PaymentWebhookHandler::new(verifier, workflow.clone()));

    let withdrawals = Arc::new(WithdrawalQueue::new(
        accounts.clone(),
        withdrawals_repo,
        locks,
    ));

    let links = PaymentLinkBuilder::new(
        config.payment.link_base_url.clone(),
        config.payment.tx_ref_prefix.clone(),
    );
    let operator = OperatorPolicy::new(AccountId::new(config.telegram.operator_id)?);

    Ok(AppState {
        webhook,
        workflow,
        coupons: allocator,
        withdrawals,
        accounts,
        links,
        operator,
    })
}
