pub mod auth;
pub mod checklists;
pub mod health;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signin                 sign in, sets session cookie (public)
/// /auth/signout                clear session cookie (public)
/// /auth/session                current session (requires auth)
///
/// /users                       list, create, delete (admin only)
///                              change own password (PATCH, requires auth)
///
/// /checklists                  submit, list own (requires auth)
///
/// /catalog                     tenants and check types (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/checklists", checklists::router())
        .route("/catalog", get(handlers::catalog::get_catalog))
}
