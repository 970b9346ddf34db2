//! Email notification delivery via SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport to send HTML
//! checklist reports. The [`Mailer`] trait is the seam the dispatcher talks
//! to, so tests can substitute an in-memory transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// There is nobody to send to.
    #[error("No recipients configured")]
    NoRecipients,
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP relay.
const DEFAULT_SMTP_HOST: &str = "smtp.yandex.ru";

/// Default SMTP port (implicit TLS).
const DEFAULT_SMTP_PORT: u16 = 465;

/// Default sender address when `EMAIL_USER` is not set.
const DEFAULT_FROM_ADDRESS: &str = "zabbix@totalvideo.ru";

/// Default distribution list when `MAIL_RECIPIENTS` is not set.
const DEFAULT_RECIPIENTS: &[&str] = &["koptilins@gmail.com"];

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// TLS from the first byte (port 465).
    Implicit,
    /// Plain connection upgraded with STARTTLS (port 587).
    StartTls,
    /// Unencrypted; only for local relays such as MailHog.
    None,
}

impl SmtpTls {
    /// Parse the `SMTP_TLS` setting (`tls`, `starttls`, `none`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tls" | "implicit" => Some(Self::Implicit),
            "starttls" => Some(Self::StartTls),
            "none" | "plain" => Some(Self::None),
            _ => None,
        }
    }
}

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 465).
    pub smtp_port: u16,
    pub tls: SmtpTls,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Fixed distribution list every report goes to.
    pub recipients: Vec<String>,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable          | Default                 |
    /// |-------------------|-------------------------|
    /// | `SMTP_HOST`       | `smtp.yandex.ru`        |
    /// | `SMTP_PORT`       | `465`                   |
    /// | `SMTP_TLS`        | `tls`                   |
    /// | `SMTP_USER`       | --                      |
    /// | `SMTP_PASSWORD`   | --                      |
    /// | `EMAIL_USER`      | `zabbix@totalvideo.ru`  |
    /// | `MAIL_RECIPIENTS` | `koptilins@gmail.com`   |
    ///
    /// # Panics
    ///
    /// Panics if `SMTP_PORT` or `SMTP_TLS` is set but invalid.
    pub fn from_env() -> Self {
        let smtp_port = std::env::var("SMTP_PORT")
            .map(|p| p.parse().expect("SMTP_PORT must be a valid u16"))
            .unwrap_or(DEFAULT_SMTP_PORT);

        let tls = std::env::var("SMTP_TLS")
            .map(|t| SmtpTls::parse(&t).expect("SMTP_TLS must be one of: tls, starttls, none"))
            .unwrap_or(SmtpTls::Implicit);

        let recipients = std::env::var("MAIL_RECIPIENTS")
            .map(|raw| parse_recipients(&raw))
            .unwrap_or_else(|_| DEFAULT_RECIPIENTS.iter().map(|r| r.to_string()).collect());

        Self {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.into()),
            smtp_port,
            tls,
            from_address: std::env::var("EMAIL_USER")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            recipients,
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        }
    }
}

/// Split a comma-separated recipient list, dropping blanks.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// A fully addressed HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends emails through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first send.
    ///
    /// The sender and every recipient are parsed up front so a bad
    /// `EMAIL_USER` or `MAIL_RECIPIENTS` fails at startup.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        config.from_address.parse::<Mailbox>()?;
        if config.recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }
        for recipient in &config.recipients {
            recipient.parse::<Mailbox>()?;
        }

        let mut builder = match config.tls {
            SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?,
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            }
            SmtpTls::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            }
        }
        .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if email.to.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(email.from.parse::<Mailbox>()?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML);
        for recipient in &email.to {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }
        let message = builder
            .body(email.html.clone())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(message).await?;

        tracing::info!(
            recipients = email.to.len(),
            subject = %email.subject,
            "Notification email sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".into(),
            smtp_port: 2525,
            tls: SmtpTls::None,
            from_address: DEFAULT_FROM_ADDRESS.into(),
            recipients: vec!["ops@example.com".into()],
            smtp_user: None,
            smtp_password: None,
        }
    }

    #[test]
    fn tls_modes_parse() {
        assert_eq!(SmtpTls::parse("TLS"), Some(SmtpTls::Implicit));
        assert_eq!(SmtpTls::parse(" starttls "), Some(SmtpTls::StartTls));
        assert_eq!(SmtpTls::parse("none"), Some(SmtpTls::None));
        assert_eq!(SmtpTls::parse("ssl3"), None);
    }

    #[test]
    fn recipients_are_split_and_trimmed() {
        assert_eq!(
            parse_recipients("a@example.com, b@example.com,,"),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn email_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = EmailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[test]
    fn invalid_configured_sender_fails_at_construction() {
        let config = EmailConfig {
            from_address: "zabbix-at-totalvideo".into(),
            ..local_config()
        };
        assert!(matches!(
            SmtpMailer::new(&config),
            Err(EmailError::Address(_))
        ));
    }

    #[test]
    fn invalid_or_missing_recipients_fail_at_construction() {
        let bad = EmailConfig {
            recipients: vec!["ops@example.com".into(), "nobody".into()],
            ..local_config()
        };
        assert!(matches!(SmtpMailer::new(&bad), Err(EmailError::Address(_))));

        let none = EmailConfig {
            recipients: Vec::new(),
            ..local_config()
        };
        assert!(matches!(SmtpMailer::new(&none), Err(EmailError::NoRecipients)));
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_transport_error() {
        // Reserve a free port, then close it so nothing is listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = EmailConfig {
            smtp_host: "127.0.0.1".into(),
            smtp_port: port,
            ..local_config()
        };
        let mailer = SmtpMailer::new(&config).expect("transport builds");
        let email = OutgoingEmail {
            from: DEFAULT_FROM_ADDRESS.into(),
            to: vec!["ops@example.com".into()],
            subject: "s".into(),
            html: "<p>x</p>".into(),
        };

        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, EmailError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn invalid_sender_is_reported_before_connecting() {
        let mailer = SmtpMailer::new(&local_config()).expect("transport builds");
        let email = OutgoingEmail {
            from: "not-an-email".into(),
            to: vec!["ops@example.com".into()],
            subject: "s".into(),
            html: "<p>x</p>".into(),
        };
        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, EmailError::Address(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn empty_recipient_list_is_rejected() {
        let mailer = SmtpMailer::new(&local_config()).expect("transport builds");
        let email = OutgoingEmail {
            from: DEFAULT_FROM_ADDRESS.into(),
            to: Vec::new(),
            subject: "s".into(),
            html: "<p>x</p>".into(),
        };
        assert!(matches!(
            mailer.send(&email).await,
            Err(EmailError::NoRecipients)
        ));
    }
}
