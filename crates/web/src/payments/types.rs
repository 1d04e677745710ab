//! Wire types for the Razorpay API.
//!
//! Only the fields we read are modeled; the gateway sends plenty more.

use serde::{Deserialize, Serialize};

/// Request body for `POST /orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    /// Amount in paise.
    pub amount: i64,
    /// ISO currency code; always INR here.
    pub currency: &'static str,
    /// Our reference, echoed back by the gateway.
    pub receipt: String,
}

/// A gateway order, as returned by `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id (e.g., `order_Nxq7...`).
    pub id: String,
    /// Amount in paise.
    pub amount: i64,
    /// Currency code.
    pub currency: String,
    /// Our receipt reference.
    pub receipt: Option<String>,
    /// Gateway-side status (`created`, `attempted`, `paid`).
    pub status: String,
}

/// Error body the gateway returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorBody {
    pub error: GatewayErrorDetail,
}

/// The inner error detail.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorDetail {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// A webhook event envelope.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    /// Event name, e.g. `payment.captured` or `payment.failed`.
    pub event: String,
    pub payload: WebhookPayload,
}

/// The webhook payload wrapper.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub payment: WebhookPaymentWrapper,
}

/// Razorpay nests the payment under an `entity` key.
#[derive(Debug, Deserialize)]
pub struct WebhookPaymentWrapper {
    pub entity: WebhookPaymentEntity,
}

/// The payment entity inside a webhook.
#[derive(Debug, Deserialize)]
pub struct WebhookPaymentEntity {
    /// Gateway payment id (e.g., `pay_Nxq7...`).
    pub id: String,
    /// Gateway order id this payment belongs to.
    pub order_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_event_deserializes() {
        let body = r#"{
            "event": "payment.captured",
            "payload": {
                "payment": {
                    "entity": {
                        "id": "pay_LkNvY2aC8qzzAb",
                        "order_id": "order_LkNuZ1bB7pyyZa",
                        "amount": 22500,
                        "status": "captured"
                    }
                }
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.event, "payment.captured");
        assert_eq!(event.payload.payment.entity.id, "pay_LkNvY2aC8qzzAb");
        assert_eq!(
            event.payload.payment.entity.order_id,
            "order_LkNuZ1bB7pyyZa"
        );
    }

    #[test]
    fn test_gateway_order_deserializes() {
        let body = r#"{
            "id": "order_LkNuZ1bB7pyyZa",
            "entity": "order",
            "amount": 22500,
            "currency": "INR",
            "receipt": "hp-order-41",
            "status": "created"
        }"#;

        let order: GatewayOrder = serde_json::from_str(body).unwrap();
        assert_eq!(order.id, "order_LkNuZ1bB7pyyZa");
        assert_eq!(order.amount, 22500);
        assert_eq!(order.receipt.as_deref(), Some("hp-order-41"));
    }
}
