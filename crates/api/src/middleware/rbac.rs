//! Admin gate.
//!
//! Admin rights come from the configured username allow-list, not from the
//! user row. A valid session that is not on the list is rejected with the
//! same 401 as a missing session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a session whose username is on the admin allow-list.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !state.config.admins.is_admin(&user.username) {
            tracing::warn!(username = %user.username, "Non-admin attempted an admin operation");
            return Err(AppError::unauthorized());
        }
        Ok(RequireAdmin(user))
    }
}
