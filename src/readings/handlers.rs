use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::auth::dto::SessionQuery;
use crate::error::{not_found, ApiError};
use crate::readings::dto::{AddReadingRequest, AddReadingResponse};
use crate::readings::repo::Reading;
use crate::readings::services;
use crate::state::AppState;

pub fn reading_routes() -> Router<AppState> {
    Router::new().route(
        "/api/readings",
        get(list_readings).post(add_reading).fallback(not_found),
    )
}

#[instrument(skip(state, query))]
pub async fn list_readings(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let session_id = query.session.ok_or(ApiError::Unauthorized)?;
    let readings = services::list_readings(&state, &session_id).await?;
    Ok(Json(readings))
}

#[instrument(skip(state, body))]
pub async fn add_reading(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AddReadingResponse>, ApiError> {
    let req: AddReadingRequest = serde_json::from_value(body).map_err(|e| {
        warn!(error = %e, "malformed reading body");
        ApiError::BadRequest("Invalid request body".into())
    })?;
    services::add_reading(&state, req).await?;
    Ok(Json(AddReadingResponse { success: true }))
}
