//! Handlers for the `/users` resource.
//!
//! Creating, deleting, and listing accounts is limited to the admin
//! allow-list. Any signed-in user may change their own password.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use opcheck_core::error::CoreError;
use opcheck_core::types::DbId;
use opcheck_db::models::user::{CreateUser, UserResponse};
use opcheck_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub password: String,
    /// Display name; defaults to the username.
    #[serde(default)]
    pub name: Option<String>,
}

/// Response body for `POST /users`.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: DbId,
    pub username: String,
}

/// Request body for `PATCH /users`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub new_password: String,
}

/// Query string for `DELETE /users`.
#[derive(Debug, Deserialize)]
pub struct DeleteUserQuery {
    pub username: Option<String>,
}

/// `{ "success": true }`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

// ---------------------------------------------------------------------------
// Service functions (shared with the admin CLI)
// ---------------------------------------------------------------------------

/// Validate, hash, and insert a new account.
pub async fn register_user(
    pool: &opcheck_db::DbPool,
    input: &CreateUserRequest,
) -> AppResult<CreatedUser> {
    opcheck_core::validation::validate_input(input)?;

    if UserRepo::find_by_username(pool, &input.username)
        .await?
        .is_some()
    {
        return Err(user_exists());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(&input.username)
        .to_string();

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: input.username.clone(),
            password_hash,
            name,
        },
    )
    .await
    .map_err(|e| {
        // Lost a race with a concurrent create of the same username.
        if is_unique_violation(&e) {
            user_exists()
        } else {
            AppError::Database(e)
        }
    })?;

    Ok(CreatedUser {
        id: user.id,
        username: user.username,
    })
}

fn user_exists() -> AppError {
    AppError::Core(CoreError::Conflict("User already exists".into()))
}

fn user_not_found(username: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "User",
        key: username.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users
///
/// Create an account. Admin only.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(input): ValidJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<CreatedUser>)> {
    let created = register_user(&state.pool, &input).await?;

    tracing::info!(
        user_id = created.id,
        username = %created.username,
        created_by = %admin.username,
        "User created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/users
///
/// Change the signed-in user's own password.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidJson(input): ValidJson<ChangePasswordRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &auth_user.username)
        .await?
        .ok_or_else(|| user_not_found(&auth_user.username))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::BadRequest("Invalid current password".into()));
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, user.id, &new_hash).await? {
        return Err(user_not_found(&auth_user.username));
    }

    tracing::info!(user_id = user.id, username = %user.username, "Password changed");
    Ok(SuccessResponse::ok())
}

/// DELETE /api/users?username=<u>
///
/// Delete an account. Admin only; admin accounts can never be deleted.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<DeleteUserQuery>,
) -> AppResult<Json<SuccessResponse>> {
    let username = query
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("Username is required".into()))?;

    if state.config.admins.is_protected(&username) {
        tracing::warn!(target_user = %username, requested_by = %admin.username, "Refused to delete admin user");
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot delete admin user".into(),
        )));
    }

    if !UserRepo::delete_by_username(&state.pool, &username).await? {
        return Err(user_not_found(&username));
    }

    tracing::info!(target_user = %username, deleted_by = %admin.username, "User deleted");
    Ok(SuccessResponse::ok())
}

/// GET /api/users
///
/// List every account ordered by username. Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users))
}
