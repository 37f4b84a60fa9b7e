//! DTOs de pagos
//!
//! Requests hacia el wrapper del gateway de pagos y sus responses. Los
//! montos van siempre en unidades menores (céntimos), como los maneja el
//! propio gateway.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::payment_service::PaymentStatus;

// Request para registrar un cliente en el gateway
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(max = 100))]
    pub name: Option<String>,
}

// Request para crear un payment intent
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    #[validate(range(min = 1))]
    pub amount: i64,

    #[validate(length(min = 3, max = 3))]
    pub currency: String,

    pub customer_id: Option<String>,

    pub booking_id: Option<String>,
}

// Request para reembolsar un payment intent (total o parcial)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefundPaymentRequest {
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub payment_intent_id: String,

    #[validate(range(min = 1))]
    pub amount: Option<i64>,

    #[validate(length(max = 255))]
    pub reason: Option<String>,
}

// Response de cliente
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: String,
    pub email: String,
}

// Response de payment intent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: PaymentStatus,
    pub amount: i64,
    pub currency: String,
}

// Response de reembolso
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResponse {
    pub id: String,
    pub payment_intent_id: Option<String>,
    pub status: PaymentStatus,
    pub amount: i64,
}

/// Evento firmado recibido por webhook del gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub created: Option<i64>,
    #[serde(default)]
    pub data: serde_json::Value,
}
