pub mod auth;
pub mod catalog;
pub mod checklists;
pub mod users;
