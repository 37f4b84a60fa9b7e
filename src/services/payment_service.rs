//! Servicio de pagos
//!
//! Wrapper fino sobre el gateway de pagos hospedado: payment intents,
//! reembolsos, clientes y verificación de webhooks firmados. El gateway es
//! el dueño de todo el estado de pago; aquí no se persiste nada y ningún
//! dato de tarjeta pasa por este servicio.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::environment::EnvironmentConfig;
use crate::dto::payment_dto::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CustomerResponse, PaymentIntentResponse,
    RefundPaymentRequest, RefundResponse, WebhookEvent,
};
use crate::utils::errors::{bad_request_error, AppError};

/// Estado de pago interno - mapeado desde el status textual del gateway
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    Succeeded,
    Canceled,
    Failed,
    Unknown,
}

/// Mapear el status textual del gateway al enum interno.
///
/// Un status desconocido no es un error: el gateway puede introducir
/// estados nuevos y el caller decide qué hacer con `Unknown`.
pub fn map_payment_status(raw: &str) -> PaymentStatus {
    match raw {
        "requires_payment_method" => PaymentStatus::RequiresPaymentMethod,
        "requires_confirmation" => PaymentStatus::RequiresConfirmation,
        "requires_action" => PaymentStatus::RequiresAction,
        "processing" => PaymentStatus::Processing,
        "succeeded" => PaymentStatus::Succeeded,
        "canceled" => PaymentStatus::Canceled,
        "failed" | "payment_failed" => PaymentStatus::Failed,
        _ => PaymentStatus::Unknown,
    }
}

#[derive(Debug, Deserialize)]
struct GatewayIntent {
    id: String,
    status: String,
    amount: i64,
    currency: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayRefund {
    id: String,
    status: String,
    amount: i64,
    payment_intent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayCustomer {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: Option<GatewayErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    #[allow(dead_code)]
    code: Option<String>,
    message: Option<String>,
}

pub struct PaymentService {
    api_url: String,
    secret_key: String,
    webhook_secret: String,
    client: reqwest::Client,
}

impl PaymentService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_credentials(
            config.payment_api_url.clone(),
            config.payment_secret_key.clone(),
            config.payment_webhook_secret.clone(),
        )
    }

    pub fn with_credentials(api_url: String, secret_key: String, webhook_secret: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url,
            secret_key,
            webhook_secret,
            client,
        }
    }

    /// Registrar un cliente en el gateway
    pub async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> Result<CustomerResponse, AppError> {
        let url = format!("{}/customers", self.api_url);
        let body = serde_json::json!({
            "email": request.email,
            "name": request.name,
        });

        let customer: GatewayCustomer = self.post_gateway(&url, &body).await?;

        Ok(CustomerResponse {
            id: customer.id,
            email: customer.email.unwrap_or_else(|| request.email.clone()),
        })
    }

    /// Crear un payment intent en el gateway
    pub async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, AppError> {
        tracing::info!(
            "💳 Creando payment intent de {} {}",
            request.amount,
            request.currency
        );

        let url = format!("{}/payment_intents", self.api_url);
        let body = serde_json::json!({
            "amount": request.amount,
            "currency": request.currency,
            "customer": request.customer_id,
            "metadata": { "booking_id": request.booking_id },
        });

        let intent: GatewayIntent = self.post_gateway(&url, &body).await?;

        Ok(PaymentIntentResponse {
            id: intent.id,
            client_secret: intent.client_secret,
            status: map_payment_status(&intent.status),
            amount: intent.amount,
            currency: intent.currency,
        })
    }

    /// Reembolsar un payment intent, total o parcialmente
    pub async fn refund_payment(
        &self,
        request: &RefundPaymentRequest,
    ) -> Result<RefundResponse, AppError> {
        tracing::info!("↩️ Reembolsando intent {}", request.payment_intent_id);

        let url = format!("{}/refunds", self.api_url);
        let body = serde_json::json!({
            "payment_intent": request.payment_intent_id,
            "amount": request.amount,
            "reason": request.reason,
        });

        let refund: GatewayRefund = self.post_gateway(&url, &body).await?;

        Ok(RefundResponse {
            id: refund.id,
            payment_intent_id: refund.payment_intent,
            status: map_payment_status(&refund.status),
            amount: refund.amount,
        })
    }

    /// Verificar y decodificar un evento de webhook firmado.
    ///
    /// Formato del header: `t=<unix>,v1=<base64(sha256(secret || t || '.' || payload))>`.
    /// Cualquier problema de formato o de firma es un error del caller
    /// (400), nunca un fallo interno.
    pub fn verify_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, AppError> {
        let (timestamp, signature) = parse_signature_header(signature_header)
            .ok_or_else(|| bad_request_error("Malformed webhook signature header"))?;

        let expected = self.expected_signature(&timestamp, payload);
        if expected != signature {
            return Err(bad_request_error("Webhook signature mismatch"));
        }

        serde_json::from_slice(payload)
            .map_err(|_| bad_request_error("Malformed webhook payload"))
    }

    fn expected_signature(&self, timestamp: &str, payload: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.webhook_secret.as_bytes());
        hasher.update(timestamp.as_bytes());
        hasher.update(b".");
        hasher.update(payload);
        BASE64.encode(hasher.finalize())
    }

    /// POST autenticado al gateway con decodificación de errores
    async fn post_gateway<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.secret_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Payment gateway unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.gateway_error(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid payment gateway response: {}", e)))
    }

    /// Convertir una respuesta de error del gateway en AppError, sin
    /// filtrar detalle de transporte al caller
    async fn gateway_error(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> AppError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GatewayErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.error)
            .and_then(|error| error.message)
            .unwrap_or_else(|| format!("Payment gateway returned status {}", status));

        tracing::error!("❌ Payment gateway error ({}): {}", status, message);

        if status == reqwest::StatusCode::NOT_FOUND {
            AppError::NotFound(message)
        } else {
            AppError::ExternalApi(message)
        }
    }
}

fn parse_signature_header(header: &str) -> Option<(String, String)> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        let (key, value) = part.trim().split_once('=')?;
        match key {
            "t" => timestamp = Some(value.to_string()),
            "v1" => signature = Some(value.to_string()),
            _ => {}
        }
    }

    Some((timestamp?, signature?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> PaymentService {
        PaymentService::with_credentials(
            "https://gateway.test/v1".to_string(),
            "sk_test_123".to_string(),
            "whsec_test".to_string(),
        )
    }

    #[test]
    fn test_map_payment_status_known_values() {
        assert_eq!(
            map_payment_status("requires_payment_method"),
            PaymentStatus::RequiresPaymentMethod
        );
        assert_eq!(
            map_payment_status("requires_confirmation"),
            PaymentStatus::RequiresConfirmation
        );
        assert_eq!(
            map_payment_status("requires_action"),
            PaymentStatus::RequiresAction
        );
        assert_eq!(map_payment_status("processing"), PaymentStatus::Processing);
        assert_eq!(map_payment_status("succeeded"), PaymentStatus::Succeeded);
        assert_eq!(map_payment_status("canceled"), PaymentStatus::Canceled);
        assert_eq!(map_payment_status("failed"), PaymentStatus::Failed);
        assert_eq!(map_payment_status("payment_failed"), PaymentStatus::Failed);
    }

    #[test]
    fn test_map_payment_status_unknown_value() {
        assert_eq!(map_payment_status("on_hold"), PaymentStatus::Unknown);
        assert_eq!(map_payment_status(""), PaymentStatus::Unknown);
    }

    #[test]
    fn test_parse_signature_header() {
        let parsed = parse_signature_header("t=1712000000,v1=abc123=");
        assert_eq!(
            parsed,
            Some(("1712000000".to_string(), "abc123=".to_string()))
        );

        // Campos extra se ignoran
        let parsed = parse_signature_header("t=1,v0=old,v1=sig");
        assert_eq!(parsed, Some(("1".to_string(), "sig".to_string())));

        assert_eq!(parse_signature_header("t=1"), None);
        assert_eq!(parse_signature_header("v1=sig"), None);
        assert_eq!(parse_signature_header("garbage"), None);
    }

    #[test]
    fn test_verify_webhook_accepts_valid_signature() {
        let service = test_service();
        let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded","created":1712000000,"data":{}}"#;
        let signature = service.expected_signature("1712000000", payload);
        let header = format!("t=1712000000,v1={}", signature);

        let event = service.verify_webhook(payload, &header).unwrap();
        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "payment_intent.succeeded");
    }

    #[test]
    fn test_verify_webhook_rejects_tampered_payload() {
        let service = test_service();
        let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded","data":{}}"#;
        let signature = service.expected_signature("1712000000", payload);
        let header = format!("t=1712000000,v1={}", signature);

        let tampered = br#"{"id":"evt_2","type":"payment_intent.succeeded","data":{}}"#;
        assert!(service.verify_webhook(tampered, &header).is_err());
    }

    #[test]
    fn test_verify_webhook_rejects_wrong_timestamp() {
        let service = test_service();
        let payload = br#"{"id":"evt_1","type":"charge.refunded","data":{}}"#;
        let signature = service.expected_signature("1712000000", payload);
        let header = format!("t=1712999999,v1={}", signature);

        assert!(service.verify_webhook(payload, &header).is_err());
    }

    #[test]
    fn test_verify_webhook_rejects_malformed_header() {
        let service = test_service();
        let payload = br#"{"id":"evt_1","type":"charge.refunded","data":{}}"#;
        assert!(service.verify_webhook(payload, "not-a-header").is_err());
    }
}
