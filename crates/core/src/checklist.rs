//! Checklist payloads, statuses, and rollup rules.
//!
//! A submission is a matrix of tenant -> checks. Each cell is either unset
//! (`""` or `null` on the wire) or one of [`CheckStatus`]. Unset cells are
//! dropped before persistence; the overall [`ChecklistStatus`] is `error`
//! iff any kept cell is `Error`.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Item passed.
pub const CHECK_STATUS_OK: &str = "OK";
/// Item failed.
pub const CHECK_STATUS_ERROR: &str = "Error";

/// Every item status accepted by the database.
pub const VALID_CHECK_STATUSES: &[&str] = &[CHECK_STATUS_OK, CHECK_STATUS_ERROR];

/// Checklist with no failing items.
pub const CHECKLIST_STATUS_COMPLETED: &str = "completed";
/// Checklist with at least one failing item.
pub const CHECKLIST_STATUS_ERROR: &str = "error";

// ---------------------------------------------------------------------------
// CheckStatus
// ---------------------------------------------------------------------------

/// Result of a single tenant/check cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Error")]
    Error,
}

impl CheckStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => CHECK_STATUS_OK,
            Self::Error => CHECK_STATUS_ERROR,
        }
    }

    /// Parse from the database / wire string. Unset (`""`) is not a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            CHECK_STATUS_OK => Some(Self::Ok),
            CHECK_STATUS_ERROR => Some(Self::Error),
            _ => None,
        }
    }

    /// Glyph shown in the report.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Ok => "✅",
            Self::Error => "❌",
        }
    }
}

// ---------------------------------------------------------------------------
// ChecklistStatus
// ---------------------------------------------------------------------------

/// Overall status of a persisted checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistStatus {
    Completed,
    Error,
}

impl ChecklistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => CHECKLIST_STATUS_COMPLETED,
            Self::Error => CHECKLIST_STATUS_ERROR,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            CHECKLIST_STATUS_COMPLETED => Some(Self::Completed),
            CHECKLIST_STATUS_ERROR => Some(Self::Error),
            _ => None,
        }
    }

    /// `error` if any status is `Error`, otherwise `completed` (including
    /// when there are no statuses at all).
    pub fn from_statuses(statuses: impl IntoIterator<Item = CheckStatus>) -> Self {
        if statuses.into_iter().any(|s| s == CheckStatus::Error) {
            Self::Error
        } else {
            Self::Completed
        }
    }

    pub fn has_errors(&self) -> bool {
        *self == Self::Error
    }
}

// ---------------------------------------------------------------------------
// Submission payload
// ---------------------------------------------------------------------------

/// Request body of `POST /api/checklists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSubmission {
    pub items: Vec<ServiceChecks>,
}

/// All checks reported for one tenant. Ids are free-form: unknown ones are
/// stored as sent and rendered by their raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChecks {
    pub service: String,
    pub checks: Vec<CheckEntry>,
}

/// One cell of the matrix as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckEntry {
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(
        deserialize_with = "deserialize_cell_status",
        serialize_with = "serialize_cell_status"
    )]
    pub status: Option<CheckStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A completed cell, flattened out of the matrix, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCheck {
    pub service: String,
    pub check_type: String,
    pub status: CheckStatus,
    pub comment: Option<String>,
}

impl ServiceChecks {
    /// Checks of this tenant whose status was actually set.
    pub fn completed(&self) -> impl Iterator<Item = &CheckEntry> {
        self.checks.iter().filter(|c| c.status.is_some())
    }

    pub fn has_completed(&self) -> bool {
        self.completed().next().is_some()
    }
}

impl ChecklistSubmission {
    /// Overall rollup of the submission.
    pub fn status(&self) -> ChecklistStatus {
        ChecklistStatus::from_statuses(
            self.items
                .iter()
                .flat_map(|item| item.checks.iter())
                .filter_map(|check| check.status),
        )
    }

    /// Set cells in submission order; unset cells are dropped. Empty
    /// comments are normalized to `None`.
    pub fn completed_checks(&self) -> Vec<CompletedCheck> {
        self.items
            .iter()
            .flat_map(|item| {
                item.checks.iter().filter_map(move |check| {
                    check.status.map(|status| CompletedCheck {
                        service: item.service.clone(),
                        check_type: check.check_type.clone(),
                        status,
                        comment: check.comment.clone().filter(|c| !c.is_empty()),
                    })
                })
            })
            .collect()
    }
}

fn deserialize_cell_status<'de, D>(deserializer: D) -> Result<Option<CheckStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => CheckStatus::parse(s)
            .map(Some)
            .ok_or_else(|| de::Error::unknown_variant(s, &["OK", "Error", ""])),
    }
}

fn serialize_cell_status<S>(status: &Option<CheckStatus>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(status.map(|s| s.as_str()).unwrap_or(""))
}
