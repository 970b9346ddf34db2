//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the signed-in user from the session cookie or Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires a username on the admin allow-list.

pub mod auth;
pub mod rbac;
