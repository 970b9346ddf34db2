//! HTML rendering of submitted checklists for the notification email.

use chrono::{DateTime, TimeZone};
use opcheck_core::catalog::Catalog;
use opcheck_core::checklist::{ChecklistStatus, ChecklistSubmission};

/// Format of the "Дата:" line, e.g. `05.03.2025, 09:41:07`.
const DATE_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// `Чек-лист от {username} - Есть ошибки` or `... - Все ОК`.
pub fn subject(username: &str, status: ChecklistStatus) -> String {
    let verdict = if status.has_errors() {
        "Есть ошибки"
    } else {
        "Все ОК"
    };
    format!("Чек-лист от {username} - {verdict}")
}

/// Render the report body.
///
/// Tenants appear in submission order and only when at least one of their
/// checks was set. Every user-supplied string is HTML-escaped.
pub fn render_html<Tz>(
    catalog: &Catalog,
    submission: &ChecklistSubmission,
    username: &str,
    submitted_at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut html = format!(
        "<h2>Чек-лист от {}</h2><p>Дата: {}</p><hr>",
        html_escape(username),
        submitted_at.format(DATE_FORMAT)
    );

    for item in submission.items.iter().filter(|i| i.has_completed()) {
        html.push_str(&format!(
            "<h3>Тенант: {}</h3><ul>",
            html_escape(catalog.tenant_name(&item.service))
        ));
        for check in item.completed() {
            let Some(status) = check.status else {
                continue;
            };
            html.push_str(&format!(
                "<li>{} {}",
                status.glyph(),
                html_escape(catalog.check_name(&check.check_type))
            ));
            if let Some(comment) = check.comment.as_deref().filter(|c| !c.is_empty()) {
                html.push_str(&format!("<br>Комментарий: {}", html_escape(comment)));
            }
            html.push_str("</li>");
        }
        html.push_str("</ul><hr>");
    }

    html
}

/// Minimal HTML escaping for text content.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn submission(value: serde_json::Value) -> ChecklistSubmission {
        serde_json::from_value(value).expect("valid submission")
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 5, 9, 41, 7).unwrap()
    }

    #[test]
    fn subject_reflects_status() {
        assert_eq!(
            subject("alice", ChecklistStatus::Error),
            "Чек-лист от alice - Есть ошибки"
        );
        assert_eq!(
            subject("bob", ChecklistStatus::Completed),
            "Чек-лист от bob - Все ОК"
        );
    }

    #[test]
    fn renders_header_tenants_and_comments() {
        let catalog = Catalog::builtin();
        let sub = submission(json!({
            "items": [{
                "service": "totalvideo",
                "checks": [
                    {"type": "epg", "status": "OK"},
                    {"type": "ott", "status": "Error", "comment": "buffering"}
                ]
            }]
        }));

        let html = render_html(&catalog, &sub, "alice", &fixed_time());

        assert!(html.starts_with("<h2>Чек-лист от alice</h2><p>Дата: 05.03.2025, 09:41:07</p><hr>"));
        assert!(html.contains("<h3>Тенант: Тоталвидео</h3><ul>"));
        assert!(html.contains("<li>✅ Проверка наличия EPG на всех каналах</li>"));
        assert!(html.contains("<li>❌ Проверка вещания ОТТ<br>Комментарий: buffering</li>"));
        assert!(html.ends_with("</ul><hr>"));
    }

    #[test]
    fn tenants_without_set_checks_are_omitted() {
        let catalog = Catalog::builtin();
        let sub = submission(json!({
            "items": [
                {"service": "iks", "checks": [{"type": "epg", "status": ""}]},
                {"service": "pakt", "checks": [{"type": "vod", "status": "OK"}]}
            ]
        }));

        let html = render_html(&catalog, &sub, "bob", &fixed_time());

        assert!(!html.contains("ИКС"));
        assert!(html.contains("<h3>Тенант: ПАКТ</h3>"));
        assert_eq!(html.matches("<li>").count(), 1);
    }

    #[test]
    fn unknown_ids_render_raw_and_user_text_is_escaped() {
        let catalog = Catalog::builtin();
        let sub = submission(json!({
            "items": [{
                "service": "<b>lab</b>",
                "checks": [{"type": "dns", "status": "Error", "comment": "a & \"b\""}]
            }]
        }));

        let html = render_html(&catalog, &sub, "<eve>", &fixed_time());

        assert!(html.contains("Чек-лист от &lt;eve&gt;"));
        assert!(html.contains("Тенант: &lt;b&gt;lab&lt;/b&gt;"));
        assert!(html.contains("❌ dns<br>Комментарий: a &amp; &quot;b&quot;"));
    }

    #[test]
    fn empty_submission_renders_header_only() {
        let catalog = Catalog::builtin();
        let sub = submission(json!({"items": []}));
        let html = render_html(&catalog, &sub, "carol", &fixed_time());
        assert!(html.ends_with("</p><hr>"));
        assert!(!html.contains("<h3>"));
    }
}
