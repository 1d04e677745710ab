//! Razorpay payment gateway client.
//!
//! Thin REST client over `reqwest`. The only server-side call the
//! marketplace needs is order creation; capture happens in the browser
//! checkout, and we learn about it through the signed callback and
//! webhook (see [`signature`]).

pub mod signature;
pub mod types;

pub use signature::{verify_checkout_signature, verify_webhook_signature};
pub use types::{GatewayOrder, WebhookEvent};

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::RazorpayConfig;
use types::{CreateOrderRequest, GatewayErrorBody};

/// Errors from gateway calls.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Transport-level failure.
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the request.
    #[error("gateway error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The gateway throttled us.
    #[error("gateway rate limited")]
    RateLimited,

    /// Response body didn't match the documented shape.
    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),
}

/// Client for the Razorpay API.
#[derive(Clone)]
pub struct RazorpayClient {
    inner: Arc<RazorpayClientInner>,
}

struct RazorpayClientInner {
    client: reqwest::Client,
    api_url: String,
    key_id: String,
    key_secret: String,
    webhook_secret: String,
}

impl RazorpayClient {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            inner: Arc::new(RazorpayClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_owned(),
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.expose_secret().to_owned(),
                webhook_secret: config.webhook_secret.expose_secret().to_owned(),
            }),
        }
    }

    /// The public key id, embedded in the checkout page.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.inner.key_id
    }

    /// Create a gateway order for the given amount.
    ///
    /// `receipt` is our own order reference, echoed back by the gateway
    /// and visible in its dashboard.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` on transport failure, throttling, or a
    /// gateway-side rejection.
    pub async fn create_order(
        &self,
        amount_paise: i64,
        receipt: String,
    ) -> Result<GatewayOrder, PaymentError> {
        let request = CreateOrderRequest {
            amount: amount_paise,
            currency: "INR",
            receipt,
        };

        let response = self
            .inner
            .client
            .post(format!("{}/orders", self.inner.api_url))
            .basic_auth(&self.inner.key_id, Some(&self.inner.key_secret))
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PaymentError::RateLimited);
        }

        if !status.is_success() {
            let message = response
                .json::<GatewayErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.description)
                .unwrap_or_else(|| "no error description".to_owned());
            return Err(PaymentError::Api { status, message });
        }

        let order: GatewayOrder = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        tracing::debug!(gateway_order_id = %order.id, amount = order.amount, "gateway order created");

        Ok(order)
    }

    /// Verify a checkout callback signature with this client's key secret.
    #[must_use]
    pub fn verify_checkout(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature_hex: &str,
    ) -> bool {
        verify_checkout_signature(
            gateway_order_id,
            gateway_payment_id,
            signature_hex,
            &self.inner.key_secret,
        )
    }

    /// Verify a webhook signature with this client's webhook secret.
    #[must_use]
    pub fn verify_webhook(&self, body: &[u8], signature_hex: &str) -> bool {
        verify_webhook_signature(body, signature_hex, &self.inner.webhook_secret)
    }
}
