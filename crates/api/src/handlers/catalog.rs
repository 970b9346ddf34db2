use axum::extract::State;
use axum::Json;
use opcheck_core::catalog::Catalog;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/catalog
///
/// Tenants and check types in display order, for rendering the form.
pub async fn get_catalog(State(state): State<AppState>, _user: AuthUser) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}
