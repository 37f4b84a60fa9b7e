use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use validator::Validate;

use crate::dto::payment_dto::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CustomerResponse, PaymentIntentResponse,
    RefundPaymentRequest, RefundResponse,
};
use crate::services::payment_service::PaymentService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

/// Header con la firma de los webhooks del gateway
const SIGNATURE_HEADER: &str = "x-payment-signature";

pub fn create_payment_router() -> Router<AppState> {
    Router::new()
        .route("/customer", post(create_customer))
        .route("/intent", post(create_payment_intent))
        .route("/refund", post(refund_payment))
        .route("/webhook", post(handle_webhook))
}

async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    request.validate().map_err(AppError::Validation)?;
    let service = PaymentService::new(&state.config);
    let customer = service.create_customer(&request).await?;
    Ok(Json(customer))
}

async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    request.validate().map_err(AppError::Validation)?;
    let service = PaymentService::new(&state.config);
    let intent = service.create_payment_intent(&request).await?;
    Ok(Json(intent))
}

async fn refund_payment(
    State(state): State<AppState>,
    Json(request): Json<RefundPaymentRequest>,
) -> Result<Json<RefundResponse>, AppError> {
    request.validate().map_err(AppError::Validation)?;
    let service = PaymentService::new(&state.config);
    let refund = service.refund_payment(&request).await?;
    Ok(Json(refund))
}

/// Recibir un evento firmado del gateway; el body llega crudo porque la
/// firma cubre los bytes exactos del payload
async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| bad_request_error("Missing webhook signature header"))?;

    let service = PaymentService::new(&state.config);
    let event = service.verify_webhook(&body, signature)?;

    tracing::info!("📨 Webhook recibido: {} ({})", event.event_type, event.id);

    Ok(Json(serde_json::json!({ "received": true })))
}
