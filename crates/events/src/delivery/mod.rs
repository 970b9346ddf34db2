//! External delivery channels for checklist notifications.

pub mod email;
