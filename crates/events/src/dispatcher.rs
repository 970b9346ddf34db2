//! Checklist notification dispatch.
//!
//! Builds the report email for a persisted checklist and hands it to the
//! configured [`Mailer`]. Delivery failures never propagate: the caller gets
//! an [`EmailStatus`] describing what happened instead.

use std::sync::Arc;

use chrono::Local;
use opcheck_core::catalog::Catalog;
use opcheck_core::checklist::ChecklistSubmission;
use serde::Serialize;

use crate::delivery::email::{Mailer, OutgoingEmail};
use crate::report;

/// Outcome of a notification attempt, reported back to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailStatus {
    pub success: bool,
    pub error: Option<String>,
}

impl EmailStatus {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Renders and sends checklist reports to a fixed distribution list.
#[derive(Clone)]
pub struct NotificationDispatcher {
    mailer: Arc<dyn Mailer>,
    from: String,
    recipients: Vec<String>,
    catalog: Arc<Catalog>,
}

impl NotificationDispatcher {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        from: impl Into<String>,
        recipients: Vec<String>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            mailer,
            from: from.into(),
            recipients,
            catalog,
        }
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Build the report email for `submission` as submitted by `username`.
    pub fn compose(&self, submission: &ChecklistSubmission, username: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: self.from.clone(),
            to: self.recipients.clone(),
            subject: report::subject(username, submission.status()),
            html: report::render_html(&self.catalog, submission, username, &Local::now()),
        }
    }

    /// Send the checklist report. Never fails; the result says whether the
    /// mail went out.
    pub async fn notify_checklist(
        &self,
        submission: &ChecklistSubmission,
        username: &str,
    ) -> EmailStatus {
        let email = self.compose(submission, username);

        match self.mailer.send(&email).await {
            Ok(()) => {
                tracing::info!(
                    username,
                    recipients = email.to.len(),
                    "Checklist notification delivered"
                );
                EmailStatus::sent()
            }
            Err(e) => {
                tracing::error!(
                    username,
                    error = %e,
                    "Failed to deliver checklist notification"
                );
                EmailStatus::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::delivery::email::EmailError;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: &OutgoingEmail) -> Result<(), EmailError> {
            Err(EmailError::Build("relay unreachable".into()))
        }
    }

    fn submission() -> ChecklistSubmission {
        serde_json::from_value(json!({
            "items": [{
                "service": "totalvideo",
                "checks": [
                    {"type": "epg", "status": "OK"},
                    {"type": "ott", "status": "Error", "comment": "buffering"}
                ]
            }]
        }))
        .unwrap()
    }

    fn dispatcher(mailer: Arc<dyn Mailer>) -> NotificationDispatcher {
        NotificationDispatcher::new(
            mailer,
            "zabbix@totalvideo.ru",
            vec!["ops@example.com".into(), "noc@example.com".into()],
            Arc::new(Catalog::builtin()),
        )
    }

    #[tokio::test]
    async fn successful_send_reports_success() {
        let mailer = Arc::new(RecordingMailer::default());
        let status = dispatcher(mailer.clone())
            .notify_checklist(&submission(), "alice")
            .await;

        assert_eq!(status, EmailStatus::sent());
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Чек-лист от alice - Есть ошибки");
        assert_eq!(sent[0].from, "zabbix@totalvideo.ru");
        assert_eq!(sent[0].to.len(), 2);
        assert!(sent[0].html.contains("Комментарий: buffering"));
    }

    #[tokio::test]
    async fn failed_send_is_reported_not_raised() {
        let status = dispatcher(Arc::new(FailingMailer))
            .notify_checklist(&submission(), "alice")
            .await;

        assert!(!status.success);
        assert_eq!(
            status.error.as_deref(),
            Some("Email build error: relay unreachable")
        );
    }

    #[test]
    fn status_serializes_error_as_null_on_success() {
        assert_eq!(
            serde_json::to_value(EmailStatus::sent()).unwrap(),
            json!({"success": true, "error": null})
        );
        assert_eq!(
            serde_json::to_value(EmailStatus::failed("boom")).unwrap(),
            json!({"success": false, "error": "boom"})
        );
    }
}
