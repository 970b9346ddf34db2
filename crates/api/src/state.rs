use std::sync::Arc;

use opcheck_core::catalog::Catalog;
use opcheck_events::NotificationDispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: opcheck_db::DbPool,
    /// Server configuration (JWT secret, admin allow-list, cookie flags).
    pub config: Arc<ServerConfig>,
    /// Tenant and check-type tables, loaded once at startup.
    pub catalog: Arc<Catalog>,
    /// Renders and sends checklist notification emails.
    pub notifier: Arc<NotificationDispatcher>,
}
