//! Checklist notification delivery.
//!
//! - [`report`] -- renders a submitted checklist as an HTML summary.
//! - [`delivery`] -- the [`Mailer`] seam and its SMTP implementation.
//! - [`NotificationDispatcher`] -- renders, addresses, and sends the report,
//!   turning delivery failures into an [`EmailStatus`] instead of an error.

pub mod delivery;
pub mod dispatcher;
pub mod report;

pub use delivery::email::{EmailConfig, EmailError, Mailer, OutgoingEmail, SmtpMailer, SmtpTls};
pub use dispatcher::{EmailStatus, NotificationDispatcher};
