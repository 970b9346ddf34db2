//! Tenant and check-type catalog.
//!
//! One ordered table of tenants and one ordered table of check types, built
//! once at startup and shared by request validation, report rendering, and
//! the checklist form. Lookups by unknown id fall back to the raw id so a
//! stale client never breaks rendering.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One external video-delivery deployment being checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// One manual operational health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckType {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

/// `(id, display name, url)` for every built-in tenant, in display order.
const BUILTIN_TENANTS: &[(&str, &str, &str)] = &[
    ("totalvideo", "Тоталвидео", "https://cdn.totalvideo.prod.totalvideo.ru/"),
    ("aksioma", "Аксиома", "https://aksioma.example.com"),
    ("pakt", "ПАКТ", "https://pakt.example.com"),
    ("iks", "ИКС", "https://iks.example.com"),
    ("jupiter", "Юпитер", "https://jupiter.example.com"),
    ("sibseti", "Сиб Сети", "https://sibseti.example.com"),
    ("tmpk", "ТМПК", "https://tmpk.example.com"),
    ("zhanr", "Жанр", "https://zhanr.example.com"),
];

/// `(id, description)` for every built-in check type, in display order.
const BUILTIN_CHECK_TYPES: &[(&str, &str)] = &[
    ("epg", "Проверка наличия EPG на всех каналах"),
    ("ott", "Проверка вещания ОТТ"),
    ("sync", "Проверка расхождения видео со звуком"),
    ("rec", "Проверка наличия записей на каналах"),
    ("req", "Проверка наличия рекомендаций"),
    ("lib", "Проверка наличия библиотек VOD"),
    ("vod", "Проверка доступности VOD"),
];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered tenant and check-type tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub tenants: Vec<Tenant>,
    pub check_types: Vec<CheckType>,
}

impl Catalog {
    /// Build a catalog, rejecting empty tables and duplicate ids.
    pub fn new(tenants: Vec<Tenant>, check_types: Vec<CheckType>) -> Result<Self, CoreError> {
        if tenants.is_empty() {
            return Err(CoreError::Validation(
                "Catalog must contain at least one tenant".into(),
            ));
        }
        if check_types.is_empty() {
            return Err(CoreError::Validation(
                "Catalog must contain at least one check type".into(),
            ));
        }
        if let Some(dup) = first_duplicate(tenants.iter().map(|t| t.id.as_str())) {
            return Err(CoreError::Validation(format!("Duplicate tenant id '{dup}'")));
        }
        if let Some(dup) = first_duplicate(check_types.iter().map(|c| c.id.as_str())) {
            return Err(CoreError::Validation(format!(
                "Duplicate check type id '{dup}'"
            )));
        }
        Ok(Self {
            tenants,
            check_types,
        })
    }

    /// The eight tenants and seven check types the service ships with.
    pub fn builtin() -> Self {
        Self {
            tenants: BUILTIN_TENANTS
                .iter()
                .map(|(id, name, url)| Tenant {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    url: (*url).to_string(),
                })
                .collect(),
            check_types: BUILTIN_CHECK_TYPES
                .iter()
                .map(|(id, name)| CheckType {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }

    /// Parse a catalog from its JSON representation
    /// (`{"tenants": [...], "checkTypes": [...]}`).
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let parsed: Catalog = serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid catalog JSON: {e}")))?;
        Self::new(parsed.tenants, parsed.check_types)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!("Cannot read catalog {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn tenant(&self, id: &str) -> Option<&Tenant> {
        self.tenants.iter().find(|t| t.id == id)
    }

    pub fn check_type(&self, id: &str) -> Option<&CheckType> {
        self.check_types.iter().find(|c| c.id == id)
    }

    /// Display name of a tenant, or the raw id when unknown.
    pub fn tenant_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.tenant(id).map(|t| t.name.as_str()).unwrap_or(id)
    }

    /// Description of a check type, or the raw id when unknown.
    pub fn check_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.check_type(id).map(|c| c.name.as_str()).unwrap_or(id)
    }

    /// Number of cells in a full checklist (tenants x check types).
    pub fn cell_count(&self) -> usize {
        self.tenants.len() * self.check_types.len()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn first_duplicate<'a>(ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for id in ids {
        if seen.contains(&id) {
            return Some(id);
        }
        seen.push(id);
    }
    None
}
