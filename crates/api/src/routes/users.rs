//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                 -> list_users (admin)
/// POST   /                 -> create_user (admin)
/// PATCH  /                 -> change_password (any session, self only)
/// DELETE /?username=<u>    -> delete_user (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(users::list_users)
            .post(users::create_user)
            .patch(users::change_password)
            .delete(users::delete_user),
    )
}
