//! Client-side checklist form state.
//!
//! Holds the tenant x check-type matrix while an operator fills it in. Every
//! cell starts unset; the form only produces a [`ChecklistSubmission`] once
//! no unset cells remain.

use crate::catalog::Catalog;
use crate::checklist::{CheckEntry, CheckStatus, ChecklistSubmission, ServiceChecks};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown tenant '{0}'")]
    UnknownTenant(String),

    #[error("Unknown check type '{0}'")]
    UnknownCheck(String),

    #[error("Catalog has no tenants or no check types")]
    EmptyCatalog,

    /// Submission attempted while some cells are still unset.
    #[error("All checks for all tenants must be completed before submitting ({unset} remaining)")]
    Incomplete { unset: usize },
}

/// One tenant/check cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub status: Option<CheckStatus>,
    pub comment: String,
}

/// Matrix of cells, one row per tenant, one column per check type.
#[derive(Debug, Clone)]
pub struct ChecklistForm {
    tenant_ids: Vec<String>,
    check_ids: Vec<String>,
    rows: Vec<Vec<Cell>>,
    active: usize,
}

impl ChecklistForm {
    /// Empty form over the catalog; the first tenant is active. A catalog
    /// without tenants or check types has no cells to fill.
    pub fn new(catalog: &Catalog) -> Result<Self, FormError> {
        if catalog.cell_count() == 0 {
            return Err(FormError::EmptyCatalog);
        }
        let tenant_ids: Vec<String> = catalog.tenants.iter().map(|t| t.id.clone()).collect();
        let check_ids: Vec<String> = catalog.check_types.iter().map(|c| c.id.clone()).collect();
        let rows = vec![vec![Cell::default(); check_ids.len()]; tenant_ids.len()];
        Ok(Self {
            tenant_ids,
            check_ids,
            rows,
            active: 0,
        })
    }

    pub fn active_tenant(&self) -> &str {
        &self.tenant_ids[self.active]
    }

    pub fn select_tenant(&mut self, tenant: &str) -> Result<(), FormError> {
        self.active = self.tenant_index(tenant)?;
        Ok(())
    }

    pub fn cell(&self, tenant: &str, check: &str) -> Result<&Cell, FormError> {
        let (t, c) = self.position(tenant, check)?;
        Ok(&self.rows[t][c])
    }

    /// Set or clear a cell's status. The comment is kept so toggling back to
    /// `Error` restores it.
    pub fn set_status(
        &mut self,
        tenant: &str,
        check: &str,
        status: Option<CheckStatus>,
    ) -> Result<(), FormError> {
        let (t, c) = self.position(tenant, check)?;
        self.rows[t][c].status = status;
        Ok(())
    }

    pub fn set_comment(
        &mut self,
        tenant: &str,
        check: &str,
        comment: impl Into<String>,
    ) -> Result<(), FormError> {
        let (t, c) = self.position(tenant, check)?;
        self.rows[t][c].comment = comment.into();
        Ok(())
    }

    /// The comment field is only shown for failing cells.
    pub fn comment_visible(&self, tenant: &str, check: &str) -> Result<bool, FormError> {
        Ok(self.cell(tenant, check)?.status == Some(CheckStatus::Error))
    }

    /// Mark every check of the active tenant as OK.
    pub fn mark_all_ok(&mut self) {
        for cell in &mut self.rows[self.active] {
            cell.status = Some(CheckStatus::Ok);
        }
    }

    /// `Error` if any cell failed, `OK` if every cell passed, unset otherwise.
    pub fn tenant_status(&self, tenant: &str) -> Result<Option<CheckStatus>, FormError> {
        let row = &self.rows[self.tenant_index(tenant)?];
        if row.iter().any(|c| c.status == Some(CheckStatus::Error)) {
            return Ok(Some(CheckStatus::Error));
        }
        if row.iter().all(|c| c.status == Some(CheckStatus::Ok)) {
            return Ok(Some(CheckStatus::Ok));
        }
        Ok(None)
    }

    pub fn unset_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|c| c.status.is_none())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.unset_count() == 0
    }

    /// Build the request payload, refusing while any cell is unset.
    pub fn submission(&self) -> Result<ChecklistSubmission, FormError> {
        let unset = self.unset_count();
        if unset > 0 {
            return Err(FormError::Incomplete { unset });
        }

        let items = self
            .tenant_ids
            .iter()
            .zip(&self.rows)
            .map(|(service, row)| ServiceChecks {
                service: service.clone(),
                checks: self
                    .check_ids
                    .iter()
                    .zip(row)
                    .map(|(check_type, cell)| CheckEntry {
                        check_type: check_type.clone(),
                        status: cell.status,
                        comment: Some(cell.comment.trim().to_string()).filter(|c| !c.is_empty()),
                    })
                    .collect(),
            })
            .collect();

        Ok(ChecklistSubmission { items })
    }

    /// Clear every cell and reactivate the first tenant.
    pub fn reset(&mut self) {
        for cell in self.rows.iter_mut().flatten() {
            *cell = Cell::default();
        }
        self.active = 0;
    }

    fn tenant_index(&self, tenant: &str) -> Result<usize, FormError> {
        self.tenant_ids
            .iter()
            .position(|t| t == tenant)
            .ok_or_else(|| FormError::UnknownTenant(tenant.to_string()))
    }

    fn position(&self, tenant: &str, check: &str) -> Result<(usize, usize), FormError> {
        let t = self.tenant_index(tenant)?;
        let c = self
            .check_ids
            .iter()
            .position(|id| id == check)
            .ok_or_else(|| FormError::UnknownCheck(check.to_string()))?;
        Ok((t, c))
    }
}
