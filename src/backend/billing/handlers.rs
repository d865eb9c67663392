/**
 * Billing Handlers
 *
 * - `POST /api/create-checkout-session` opens a Stripe subscription checkout
 *   for the caller, creating the Stripe customer on first use.
 * - `POST /api/webhook` receives Stripe events. The raw body is verified
 *   against the `Stripe-Signature` header before anything is parsed.
 *
 * Once an event is verified the webhook always answers `{received: true}`:
 * an account that cannot be resolved or a storage failure is logged, not
 * reported back to Stripe.
 */

use axum::{extract::State, http::HeaderMap, Json};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::backend::auth::accounts::{get_account_by_id, set_stripe_customer_id};
use crate::backend::billing::db::{activate_subscription, cancel_subscription, from_unix, PeriodInfo};
use crate::backend::billing::signature::{verify_stripe_signature, SignatureError};
use crate::backend::billing::stripe::{CheckoutParams, StripeClient};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use crate::shared::Plan;

pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub price_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Deserialize)]
struct StripeEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: Value,
}

fn get_str<'v>(obj: &'v Value, pointer: &str) -> Option<&'v str> {
    obj.pointer(pointer).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Price purchased in a completed checkout session
///
/// `metadata.priceId` is written when the session is created; expanded
/// `line_items` are only used as a fallback.
fn session_price_id(session: &Value) -> Option<&str> {
    get_str(session, "/metadata/priceId").or_else(|| get_str(session, "/line_items/data/0/price/id"))
}

/// Plan granted by a price
pub fn plan_for_price(config: &ServerConfig, price_id: Option<&str>) -> Plan {
    match (price_id, config.stripe_price_yearly.as_deref()) {
        (Some(price), Some(yearly)) if price == yearly => Plan::PremiumYearly,
        _ => Plan::PremiumMonthly,
    }
}

fn stripe_secret(config: &ServerConfig) -> BackendResult<&str> {
    config.stripe_secret_key.as_deref().ok_or_else(|| {
        tracing::error!("STRIPE_SECRET_KEY is not configured");
        BackendError::config("STRIPE_SECRET_KEY is not configured")
    })
}

/// POST /api/create-checkout-session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CheckoutRequest>,
) -> BackendResult<Json<CheckoutResponse>> {
    let price_id = request
        .price_id
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| BackendError::validation("priceId is required"))?;

    let account = get_account_by_id(&state.db, user.0.account_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let secret = stripe_secret(&state.config)?;
    let stripe = StripeClient::new(&state.http, &state.config.stripe_api_base, secret);

    let customer_id = match account.stripe_customer_id.clone() {
        Some(id) => id,
        None => {
            let id = stripe.create_customer(&account.email, account.id).await?;
            set_stripe_customer_id(&state.db, account.id, &id).await?;
            tracing::info!("Stripe customer {} created for {}", id, account.id);
            id
        }
    };

    let session = stripe
        .create_checkout_session(&CheckoutParams {
            customer_id: &customer_id,
            price_id: &price_id,
            account_id: account.id,
            success_url: state.config.checkout_success_url(),
            cancel_url: state.config.checkout_cancel_url(),
        })
        .await
        .inspect_err(|e| tracing::error!("Checkout session failed for {}: {}", account.id, e))?;

    tracing::info!("Checkout session {} opened for {}", session.id, account.id);

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// POST /api/webhook
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> BackendResult<Json<WebhookAck>> {
    let event = verify_event(&state.config, &headers, &body).map_err(|reason| {
        tracing::warn!("Webhook rejected: {}", reason);
        BackendError::webhook(reason)
    })?;

    match event.event_type.as_str() {
        "checkout.session.completed" => on_checkout_completed(&state, &event.data.object).await,
        "customer.subscription.deleted" => on_subscription_deleted(&state, &event.data.object).await,
        other => tracing::debug!("Ignored Stripe event: {}", other),
    }

    Ok(Json(WebhookAck { received: true }))
}

fn verify_event(config: &ServerConfig, headers: &HeaderMap, body: &[u8]) -> Result<StripeEvent, String> {
    let header = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| SignatureError::MissingHeader.to_string())?;

    let secret = config
        .stripe_webhook_secret
        .as_deref()
        .ok_or_else(|| SignatureError::MissingSecret.to_string())?;

    verify_stripe_signature(secret, header, body, Utc::now().timestamp()).map_err(|e| e.to_string())?;

    serde_json::from_slice(body).map_err(|e| format!("Invalid event payload: {}", e))
}

async fn on_checkout_completed(state: &AppState, session: &Value) {
    let Some(account_id) = get_str(session, "/metadata/userId").and_then(|id| Uuid::parse_str(id).ok())
    else {
        tracing::warn!("Checkout session without a usable metadata.userId");
        return;
    };
    let Some(subscription_id) = get_str(session, "/subscription") else {
        tracing::warn!("Checkout session for {} without a subscription", account_id);
        return;
    };

    let price_id = session_price_id(session);
    let plan = plan_for_price(&state.config, price_id);

    match activate_subscription(&state.db, account_id, subscription_id, price_id, plan).await {
        Ok(true) => tracing::info!("Account {} upgraded to {} ({})", account_id, plan, subscription_id),
        Ok(false) => tracing::warn!("Checkout completed for unknown account {}", account_id),
        Err(e) => tracing::error!("Failed to activate subscription {}: {:?}", subscription_id, e),
    }
}

async fn on_subscription_deleted(state: &AppState, subscription: &Value) {
    let Some(subscription_id) = get_str(subscription, "/id") else {
        tracing::warn!("Subscription deletion without an id");
        return;
    };

    let period = PeriodInfo {
        start: subscription
            .get("current_period_start")
            .and_then(Value::as_i64)
            .and_then(from_unix),
        end: subscription
            .get("current_period_end")
            .and_then(Value::as_i64)
            .and_then(from_unix),
        cancel_at_period_end: subscription.get("cancel_at_period_end").and_then(Value::as_bool),
    };

    match cancel_subscription(&state.db, subscription_id, &period).await {
        Ok(true) => tracing::info!("Subscription {} canceled, account reverted to FREE", subscription_id),
        Ok(false) => tracing::info!("Subscription {} canceled, no matching account", subscription_id),
        Err(e) => tracing::error!("Failed to cancel subscription {}: {:?}", subscription_id, e),
    }
}
