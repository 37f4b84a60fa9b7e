use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;
use serde_json::json;

use transport_rental::config::environment::EnvironmentConfig;
use transport_rental::database::DatabaseConnection;
use transport_rental::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use transport_rental::routes;
use transport_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚖 Transport Rental - API de catálogo y pagos");
    info!("=============================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Crear router de la API
    let config = EnvironmentConfig::default();
    let app_state = AppState::new(pool, config.clone());

    // CORS abierto solo fuera de producción
    let cors = if config.is_production() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/amenity", routes::amenity_routes::create_amenity_router())
        .nest("/api/payment", routes::payment_routes::create_payment_router())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🛋️ Endpoints - Amenity:");
    info!("   GET  /api/amenity - Listar amenities (filtros: category, isActive)");
    info!("   POST /api/amenity - Crear amenity");
    info!("💳 Endpoints - Payment:");
    info!("   POST /api/payment/customer - Registrar cliente");
    info!("   POST /api/payment/intent - Crear payment intent");
    info!("   POST /api/payment/refund - Reembolsar pago");
    info!("   POST /api/payment/webhook - Webhook firmado del gateway");

    // Iniciar servidor con apagado graceful
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "transport-rental",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
