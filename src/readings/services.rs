use tracing::info;

use crate::error::ApiError;
use crate::readings::dto::AddReadingRequest;
use crate::readings::repo::{self, Reading};
use crate::state::AppState;

/// Record one reading for the session's user. No range or date-format
/// checks happen here; that validation lives in the UI.
pub async fn add_reading(state: &AppState, req: AddReadingRequest) -> Result<(), ApiError> {
    let session = state
        .sessions
        .lookup(&req.session)
        .await
        .ok_or(ApiError::Unauthorized)?;

    let time = if req.time.is_empty() {
        req.kind.default_time().to_string()
    } else {
        req.time
    };
    let reading = Reading {
        date: req.date,
        time,
        kind: req.kind,
        value: req.value,
    };

    repo::append(state.sheets.as_ref(), &session.user_id, &reading)
        .await
        .map_err(|e| ApiError::StoreUnavailable {
            message: "Failed to add reading",
            source: e,
        })?;

    info!(user_id = %session.user_id, kind = %reading.kind.as_str(), "reading recorded");
    Ok(())
}

/// List every reading owned by the session's user.
pub async fn list_readings(
    state: &AppState,
    session_id: &str,
) -> Result<Vec<Reading>, ApiError> {
    let session = state
        .sessions
        .lookup(session_id)
        .await
        .ok_or(ApiError::Unauthorized)?;
    Ok(repo::list_for_user(state.sheets.as_ref(), &session.user_id).await)
}
