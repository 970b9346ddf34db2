//! Handlers for the `/checklists` resource.

use axum::extract::State;
use axum::Json;
use opcheck_core::checklist::ChecklistSubmission;
use opcheck_db::models::checklist::{ChecklistWithItems, CreateChecklist};
use opcheck_db::repositories::ChecklistRepo;
use opcheck_events::EmailStatus;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response body for `POST /checklists`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitChecklistResponse {
    pub checklist: ChecklistWithItems,
    pub email_status: EmailStatus,
}

/// POST /api/checklists
///
/// Persist the submission (header and set items in one transaction), then
/// send the report email. A failed email does not undo the checklist; it is
/// reported in `emailStatus`.
pub async fn submit_checklist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(submission): AppJson<ChecklistSubmission>,
) -> AppResult<Json<SubmitChecklistResponse>> {
    let input = CreateChecklist {
        user_id: auth_user.user_id,
        status: submission.status(),
        items: submission.completed_checks(),
    };
    let checklist = ChecklistRepo::create(&state.pool, &input).await?;

    tracing::info!(
        checklist_id = checklist.checklist.id,
        user_id = auth_user.user_id,
        item_count = checklist.items.len(),
        status = input.status.as_str(),
        "Checklist submitted"
    );

    let email_status = state
        .notifier
        .notify_checklist(&submission, &auth_user.username)
        .await;

    Ok(Json(SubmitChecklistResponse {
        checklist,
        email_status,
    }))
}

/// GET /api/checklists
///
/// The caller's own checklists with their items, newest first.
pub async fn list_checklists(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<ChecklistWithItems>>> {
    let checklists = ChecklistRepo::list_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(checklists))
}
