//! Domain types for the operational checklist service.
//!
//! Nothing in this crate performs I/O: it holds the error taxonomy, the
//! tenant/check-type catalog, checklist payloads with their rollup rules,
//! and the checklist form state machine used by clients.

pub mod catalog;
pub mod checklist;
pub mod checklist_form;
pub mod error;
pub mod roles;
pub mod types;
pub mod validation;
