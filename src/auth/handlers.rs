use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::auth::dto::{
    AuthResponse, LoginRequest, LogoutResponse, PublicUser, SessionQuery, SignupRequest,
};
use crate::auth::services;
use crate::error::{not_found, ApiError};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login).fallback(not_found))
        .route("/api/signup", post(signup).fallback(not_found))
        .route("/api/logout", post(logout).fallback(not_found))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/api/user", get(current_user).fallback(not_found))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req: LoginRequest = parse_body(body, "login")?;
    let auth = services::login(&state, &req.username, &req.password).await?;
    Ok(Json(auth_response(auth)))
}

#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req: SignupRequest = parse_body(body, "signup")?;
    let auth = services::signup(&state, req).await?;
    Ok(Json(auth_response(auth)))
}

#[instrument(skip(state, query))]
pub async fn logout(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Json<LogoutResponse> {
    if let Some(session_id) = query.session.as_deref() {
        services::logout(&state, session_id).await;
    }
    Json(LogoutResponse { success: true })
}

#[instrument(skip(state, query))]
pub async fn current_user(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<PublicUser>, ApiError> {
    let session_id = query.session.ok_or(ApiError::Unauthorized)?;
    let session = services::current_user(&state, &session_id).await?;
    Ok(Json(PublicUser {
        user_id: session.user_id,
        username: session.username,
    }))
}

/// Decode a JSON body into a concrete request type. Every shape
/// mismatch maps to the same 400 body.
fn parse_body<T: serde::de::DeserializeOwned>(
    body: serde_json::Value,
    route: &'static str,
) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| {
        warn!(error = %e, route, "malformed request body");
        ApiError::BadRequest("Invalid request body".into())
    })
}

fn auth_response(auth: services::AuthSuccess) -> AuthResponse {
    AuthResponse {
        session_id: auth.session_id,
        user: PublicUser {
            user_id: auth.user.id,
            username: auth.user.username,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn signup_then_get_user_round_trip() {
        let state = AppState::fake();

        let Json(auth) = signup(
            State(state.clone()),
            Json(json!({
                "username": "alice",
                "password": "pw123",
                "name": "Alice",
                "age": "30",
                "gender": "female"
            })),
        )
        .await
        .expect("signup");
        assert!(!auth.session_id.is_empty());

        let Json(user) = current_user(
            State(state),
            Query(SessionQuery {
                session: Some(auth.session_id),
            }),
        )
        .await
        .expect("session resolves");
        assert_eq!(user.username, "alice");
        assert_eq!(user.user_id, auth.user.user_id);
    }

    #[tokio::test]
    async fn missing_fields_are_a_bad_request() {
        let state = AppState::fake();

        let err = signup(
            State(state),
            Json(json!({ "username": "alice", "password": "pw123" })),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn get_user_without_session_param_is_unauthorized() {
        let state = AppState::fake();

        let err = current_user(State(state), Query(SessionQuery { session: None }))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn logout_succeeds_even_for_absent_sessions() {
        let state = AppState::fake();

        let Json(response) = logout(
            State(state.clone()),
            Query(SessionQuery {
                session: Some("never-existed".into()),
            }),
        )
        .await;
        assert!(response.success);

        let Json(response) = logout(State(state), Query(SessionQuery { session: None })).await;
        assert!(response.success);
    }
}
