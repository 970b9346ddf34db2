//! Route definitions for the `/checklists` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::checklists;
use crate::state::AppState;

/// Routes mounted at `/checklists`.
///
/// ```text
/// GET  /   -> list_checklists (own history)
/// POST /   -> submit_checklist
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(checklists::list_checklists).post(checklists::submit_checklist),
    )
}
