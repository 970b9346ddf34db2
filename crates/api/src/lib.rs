//! Operational checklist API server library.
//!
//! Exposes the building blocks (config, state, error handling, auth, routes)
//! so the server binary, the admin CLI, and integration tests share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
