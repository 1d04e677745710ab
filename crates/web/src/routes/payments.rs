//! Payment callback and webhook route handlers.
//!
//! Two independent channels settle a payment:
//!
//! - the browser posts the signed checkout result to `/payments/callback`;
//! - the gateway posts signed webhooks to `/payments/webhook`.
//!
//! Either may arrive first. Settlement is idempotent, so whichever lands
//! second becomes a no-op.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::payments::types::WebhookEvent;
use crate::services::orders::{OrderError, OrderService, SettlementOutcome};
use crate::state::AppState;

/// Signature header on gateway webhooks.
const WEBHOOK_SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Checkout callback form data, posted by the gateway's browser widget.
#[derive(Debug, Deserialize)]
pub struct CallbackForm {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Payment result page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment_result.html")]
pub struct PaymentResultTemplate {
    pub success: bool,
}

/// Handle the signed checkout callback.
///
/// The signature covers `order_id|payment_id` with the API key secret. A
/// bad signature is treated exactly like a failed payment: the money is
/// not considered captured, whatever the browser claims.
pub async fn callback(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<CallbackForm>,
) -> Result<Response, AppError> {
    let verified = state.razorpay().verify_checkout(
        &form.razorpay_order_id,
        &form.razorpay_payment_id,
        &form.razorpay_signature,
    );

    if !verified {
        tracing::warn!(gateway_order_id = %form.razorpay_order_id,
            "checkout callback signature verification failed");
    }

    let outcome = OrderService::new(state.pool())
        .settle_payment(
            &form.razorpay_order_id,
            &form.razorpay_payment_id,
            verified,
        )
        .await
        .map_err(|e| match e {
            OrderError::NotFound => {
                AppError::NotFound(format!("payment for {}", form.razorpay_order_id))
            }
            other => other.into(),
        })?;

    let success = matches!(
        outcome,
        SettlementOutcome::Captured | SettlementOutcome::AlreadySettled
    ) && verified;

    Ok(PaymentResultTemplate { success }.into_response())
}

/// Handle a gateway webhook.
///
/// The signature is verified over the raw body before anything is parsed;
/// an unsigned or mis-signed body gets a 401 and is never deserialized.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    if !state.razorpay().verify_webhook(&body, signature) {
        tracing::warn!("webhook signature verification failed");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "webhook body did not parse");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let captured = match event.event.as_str() {
        "payment.captured" => true,
        "payment.failed" => false,
        other => {
            tracing::debug!(event = other, "ignoring webhook event");
            return StatusCode::OK.into_response();
        }
    };

    let entity = &event.payload.payment.entity;

    match OrderService::new(state.pool())
        .settle_payment(&entity.order_id, &entity.id, captured)
        .await
    {
        Ok(outcome) => {
            tracing::info!(event = %event.event, gateway_order_id = %entity.order_id,
                ?outcome, "webhook processed");
            StatusCode::OK.into_response()
        }
        Err(OrderError::NotFound) => {
            // Not necessarily an attack: the gateway account may carry
            // orders from other environments.
            tracing::warn!(gateway_order_id = %entity.order_id, "webhook for unknown gateway order");
            StatusCode::OK.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "webhook settlement failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
