//! Repository for the `checklists` and `checklist_items` tables.

use std::collections::HashMap;

use opcheck_core::types::DbId;
use sqlx::PgPool;

use crate::models::checklist::{Checklist, ChecklistItem, ChecklistWithItems, CreateChecklist};

/// Column list for the `checklists` table.
const COLUMNS: &str = "id, user_id, status, created_at";

/// Column list for the `checklist_items` table.
const ITEM_COLUMNS: &str = "id, checklist_id, service, check_type, status, comment";

/// Provides data access for submitted checklists.
pub struct ChecklistRepo;

impl ChecklistRepo {
    /// Insert a checklist header and all of its items in one transaction.
    ///
    /// Either the header and every item are committed, or nothing is.
    pub async fn create(
        pool: &PgPool,
        input: &CreateChecklist,
    ) -> Result<ChecklistWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO checklists (user_id, status) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        let checklist = sqlx::query_as::<_, Checklist>(&query)
            .bind(input.user_id)
            .bind(input.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let item_query = format!(
            "INSERT INTO checklist_items (checklist_id, service, check_type, status, comment) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(input.items.len());
        for check in &input.items {
            let item = sqlx::query_as::<_, ChecklistItem>(&item_query)
                .bind(checklist.id)
                .bind(&check.service)
                .bind(&check.check_type)
                .bind(check.status.as_str())
                .bind(&check.comment)
                .fetch_one(&mut *tx)
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        tracing::debug!(
            checklist_id = checklist.id,
            item_count = items.len(),
            "Checklist persisted"
        );
        Ok(ChecklistWithItems { checklist, items })
    }

    /// List a user's own checklists, newest first, each with its items.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ChecklistWithItems>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checklists \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let checklists = sqlx::query_as::<_, Checklist>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        if checklists.is_empty() {
            return Ok(Vec::new());
        }

        // One query for all items instead of one per checklist.
        let ids: Vec<DbId> = checklists.iter().map(|c| c.id).collect();
        let item_query = format!(
            "SELECT {ITEM_COLUMNS} FROM checklist_items \
             WHERE checklist_id = ANY($1) \
             ORDER BY checklist_id, id"
        );
        let items = sqlx::query_as::<_, ChecklistItem>(&item_query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_checklist: HashMap<DbId, Vec<ChecklistItem>> = HashMap::new();
        for item in items {
            by_checklist.entry(item.checklist_id).or_default().push(item);
        }

        Ok(checklists
            .into_iter()
            .map(|checklist| {
                let items = by_checklist.remove(&checklist.id).unwrap_or_default();
                ChecklistWithItems { checklist, items }
            })
            .collect())
    }
}
