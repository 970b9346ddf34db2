//! Checklist and checklist item models.

use opcheck_core::checklist::{ChecklistStatus, CompletedCheck};
use opcheck_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `checklists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: DbId,
    pub user_id: DbId,
    /// `completed` or `error`.
    pub status: String,
    pub created_at: Timestamp,
}

/// A row from the `checklist_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: DbId,
    pub checklist_id: DbId,
    pub service: String,
    pub check_type: String,
    /// `OK` or `Error`.
    pub status: String,
    pub comment: Option<String>,
}

/// A checklist together with its items, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistWithItems {
    #[serde(flatten)]
    pub checklist: Checklist,
    pub items: Vec<ChecklistItem>,
}

/// DTO for persisting one submission.
#[derive(Debug)]
pub struct CreateChecklist {
    pub user_id: DbId,
    pub status: ChecklistStatus,
    /// Only set cells; unset cells never reach the database.
    pub items: Vec<CompletedCheck>,
}
