//! CORS for the allow-listed browser origins.
//!
//! `tower-http`'s `CorsLayer` can echo or deny an origin, but not
//! substitute one: unrecognized callers here must be answered with the
//! canonical origin instead of their own, so the policy is a small
//! middleware. It also short-circuits OPTIONS preflights before
//! routing, which keeps the headers on 404s and errors too.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::AppConfig;
use crate::state::AppState;

pub async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let allow_origin = resolve_origin(&state.config, origin.as_deref()).to_string();

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&allow_origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization, X-Requested-With"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    response
}

/// Allow-listed origins pass through; anything else (including no
/// Origin at all) gets the canonical origin, never an echo.
fn resolve_origin<'a>(config: &'a AppConfig, origin: Option<&'a str>) -> &'a str {
    match origin {
        Some(origin) if config.allowed_origins.iter().any(|o| o == origin) => origin,
        _ => config.canonical_origin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            sheets_base_url: "https://sheets.invalid/v4".into(),
            sheet_id: "test".into(),
            api_token: "test".into(),
            allowed_origins: vec![
                "https://app.test".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }

    #[test]
    fn allowed_origin_passes_through() {
        let config = config();
        assert_eq!(
            resolve_origin(&config, Some("http://localhost:3000")),
            "http://localhost:3000"
        );
    }

    #[test]
    fn unknown_origin_falls_back_to_canonical_not_echo() {
        let config = config();
        assert_eq!(
            resolve_origin(&config, Some("https://evil.test")),
            "https://app.test"
        );
    }

    #[test]
    fn absent_origin_gets_canonical() {
        let config = config();
        assert_eq!(resolve_origin(&config, None), "https://app.test");
    }
}
