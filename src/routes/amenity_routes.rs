use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::amenity_controller::AmenityController;
use crate::dto::amenity_dto::{AmenityFilters, AmenityListData, CreateAmenityRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_amenity_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_amenities))
        .route("/", post(create_amenity))
}

/// GET / - listar amenities con filtros opcionales (category, isActive)
async fn list_amenities(
    State(state): State<AppState>,
    Query(filters): Query<AmenityFilters>,
) -> Result<Json<AmenityListData>, AppError> {
    let cmd = filters.parse().map_err(AppError::Validation)?;
    let controller = AmenityController::new(state.pool.clone());
    let data = controller.list(cmd).await?;
    Ok(Json(data))
}

/// POST / - crear una amenity nueva
async fn create_amenity(
    State(state): State<AppState>,
    Json(request): Json<CreateAmenityRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let cmd = request.parse().map_err(AppError::Validation)?;
    let controller = AmenityController::new(state.pool.clone());
    let amenity = controller.create(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Amenity created successfully",
            "amenity": amenity,
        })),
    ))
}
