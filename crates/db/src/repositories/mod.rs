//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod checklist_repo;
pub mod user_repo;

pub use checklist_repo::ChecklistRepo;
pub use user_repo::UserRepo;
