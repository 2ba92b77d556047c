use tracing::{error, info, warn};

use crate::auth::dto::SignupRequest;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{NewUser, User};
use crate::auth::sessions::Session;
use crate::error::ApiError;
use crate::state::AppState;

/// Outcome of a successful login or signup.
#[derive(Debug)]
pub struct AuthSuccess {
    pub session_id: String,
    pub user: User,
}

/// Look the user up, check the password, open a session. Unknown
/// username and wrong password collapse into the same
/// `InvalidCredentials` so the API cannot be used to enumerate
/// usernames.
pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<AuthSuccess, ApiError> {
    let Some(user) = User::find_by_username(state.sheets.as_ref(), username).await else {
        warn!(%username, "login: unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    let ok = match verify_password(password, &user.password_hash) {
        Ok(ok) => ok,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "stored digest unreadable");
            false
        }
    };
    if !ok {
        warn!(%username, "login: password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    let session_id = state
        .sessions
        .create(user.id.clone(), user.username.clone())
        .await;
    info!(user_id = %user.id, %username, "user logged in");
    Ok(AuthSuccess { session_id, user })
}

/// Create an account and open a session for it.
///
/// The existence check and the append below are two separate store
/// round-trips; concurrent signups with the same username can both pass
/// the check and land duplicate rows. Accepted, not guarded.
pub async fn signup(state: &AppState, req: SignupRequest) -> Result<AuthSuccess, ApiError> {
    if User::find_by_username(state.sheets.as_ref(), &req.username)
        .await
        .is_some()
    {
        warn!(username = %req.username, "signup: username taken");
        return Err(ApiError::UsernameTaken);
    }

    let password_hash = hash_password(&req.password).map_err(|e| ApiError::StoreUnavailable {
        message: "Failed to create account",
        source: e,
    })?;

    let user = User::create(
        state.sheets.as_ref(),
        NewUser {
            username: req.username,
            password_hash,
            name: req.name,
            age: req.age,
            gender: req.gender,
        },
    )
    .await
    .map_err(|e| ApiError::StoreUnavailable {
        message: "Failed to create account",
        source: e,
    })?;

    let session_id = state
        .sessions
        .create(user.id.clone(), user.username.clone())
        .await;
    info!(user_id = %user.id, username = %user.username, "user signed up");
    Ok(AuthSuccess { session_id, user })
}

/// Drop the session unconditionally. Logging out a token that was
/// already gone is a success, not an error.
pub async fn logout(state: &AppState, session_id: &str) {
    state.sessions.remove(session_id).await;
}

/// Resolve a session token to the identity it was created with.
pub async fn current_user(state: &AppState, session_id: &str) -> Result<Session, ApiError> {
    state
        .sessions
        .lookup(session_id)
        .await
        .ok_or(ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::USERS_RANGE;
    use crate::sheets::{InMemorySheets, SheetsClient};
    use std::sync::Arc;

    fn signup_alice() -> SignupRequest {
        SignupRequest {
            username: "alice".into(),
            password: "pw123".into(),
            name: "Alice".into(),
            age: "30".into(),
            gender: "female".into(),
        }
    }

    #[tokio::test]
    async fn signup_then_login_with_same_credentials() {
        let state = AppState::fake();

        let signed_up = signup(&state, signup_alice()).await.expect("signup");
        assert!(!signed_up.session_id.is_empty());

        let logged_in = login(&state, "alice", "pw123").await.expect("login");
        assert_eq!(logged_in.user.id, signed_up.user.id);
        assert_ne!(logged_in.session_id, signed_up.session_id);
    }

    #[tokio::test]
    async fn signup_opens_a_usable_session() {
        let state = AppState::fake();
        let signed_up = signup(&state, signup_alice()).await.expect("signup");

        let session = current_user(&state, &signed_up.session_id)
            .await
            .expect("session resolves");
        assert_eq!(session.user_id, signed_up.user.id);
        assert_eq!(session.username, "alice");
    }

    #[tokio::test]
    async fn taken_username_is_rejected_without_insert() {
        let sheets = Arc::new(InMemorySheets::default());
        let state = AppState::fake_with(sheets.clone());
        signup(&state, signup_alice()).await.expect("first signup");

        let err = signup(&state, signup_alice()).await.unwrap_err();
        assert!(matches!(err, ApiError::UsernameTaken));

        let rows = sheets.get_rows(USERS_RANGE).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_identically() {
        let state = AppState::fake();
        signup(&state, signup_alice()).await.expect("signup");

        let wrong_password = login(&state, "alice", "not-the-password")
            .await
            .unwrap_err();
        let unknown_user = login(&state, "nobody", "pw123").await.unwrap_err();

        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_user, ApiError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn logout_revokes_the_session_and_is_idempotent() {
        let state = AppState::fake();
        let signed_up = signup(&state, signup_alice()).await.expect("signup");

        logout(&state, &signed_up.session_id).await;
        let err = current_user(&state, &signed_up.session_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));

        // a second logout of the same token is still a success path
        logout(&state, &signed_up.session_id).await;
    }

    #[tokio::test]
    async fn signup_fails_with_500_when_store_is_down_for_writes() {
        let sheets = Arc::new(InMemorySheets::default());
        let state = AppState::fake_with(sheets.clone());

        // reads degrade to not-found, so the existence check passes and
        // the append is what surfaces the outage
        sheets.set_unavailable(true);
        let err = signup(&state, signup_alice()).await.unwrap_err();
        assert!(matches!(err, ApiError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn login_during_store_outage_reads_as_invalid_credentials() {
        let sheets = Arc::new(InMemorySheets::default());
        let state = AppState::fake_with(sheets.clone());
        signup(&state, signup_alice()).await.expect("signup");

        sheets.set_unavailable(true);
        let err = login(&state, "alice", "pw123").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }
}
