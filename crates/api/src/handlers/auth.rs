//! Handlers for the `/auth` resource (sign-in, sign-out, current session).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderName, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use opcheck_core::error::CoreError;
use opcheck_core::types::{DbId, Timestamp};
use opcheck_db::models::user::UserResponse;
use opcheck_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_session_token;
use crate::auth::password::{verify_against_dummy, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

/// Successful sign-in response. The token is also set as a cookie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: Timestamp,
}

/// Response body for `GET /auth/session`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: DbId,
    pub username: String,
    pub name: String,
    pub is_admin: bool,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signin
///
/// Authenticate with username + password. Returns the session token and
/// sets it as an HttpOnly cookie.
pub async fn signin(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignInRequest>,
) -> AppResult<([(HeaderName, String); 1], Json<SignInResponse>)> {
    let Some(user) = UserRepo::find_by_username(&state.pool, &input.username).await? else {
        verify_against_dummy(&input.password);
        tracing::info!(username = %input.username, "Sign-in failed: unknown user");
        return Err(invalid_credentials());
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(username = %user.username, "Sign-in failed: wrong password");
        return Err(invalid_credentials());
    }

    let session = generate_session_token(user.id, &user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        jti = %session.claims.jti,
        "User signed in"
    );

    let cookie = session_cookie(
        &session.token,
        state.config.jwt.max_age_secs(),
        state.config.cookie_secure,
    );

    Ok((
        [(SET_COOKIE, cookie)],
        Json(SignInResponse {
            user: UserResponse::from(&user),
            token: session.token,
            expires_at: session.expires_at,
        }),
    ))
}

/// POST /api/auth/signout
///
/// Clears the session cookie. Returns 204 No Content. The token itself stays
/// valid until it expires.
pub async fn signout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
    )
}

/// GET /api/auth/session
///
/// Describe the current session. A token whose user has since been deleted
/// is rejected with 401.
pub async fn session(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<SessionResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    let is_admin = state.config.admins.is_admin(&user.username);
    Ok(Json(SessionResponse {
        id: user.id,
        username: user.username,
        name: user.name,
        is_admin,
    }))
}
