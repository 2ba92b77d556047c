use serde::{Deserialize, Serialize};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub age: String,
    pub gender: String,
}

/// Query parameter carrying the session token on GET and logout routes.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session: Option<String>,
}

/// Public part of the user returned to the client. The password digest
/// never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: String,
    pub username: String,
}

/// Response returned after login or signup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub session_id: String,
    pub user: PublicUser,
}

/// Response for logout, returned whether or not the session existed.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}
