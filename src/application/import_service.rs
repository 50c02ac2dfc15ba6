use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::domain::{
    DomainError, EMPLOYEE_ENTITY_CLASS, TenantId, UploadReport, ValidationSummary,
    format_employee_code,
};
use crate::importer::batch::{self, BatchOutcome, CheckedRow};
use crate::importer::parser::{self, ParseLimits};
use crate::importer::{ingest, report, validator};
use crate::infrastructure::{DepartmentDirectory, EmployeeRepository};
use crate::sequence::SequenceStore;

#[derive(Debug, Clone)]
pub struct ImportLimits {
    pub max_upload_bytes: usize,
    pub max_rows: usize,
    /// Fixed slice of the wall-clock budget, on top of the per-row slice.
    pub base_budget: Duration,
    pub per_row_budget: Duration,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            max_rows: 2000,
            base_budget: Duration::from_secs(2),
            per_row_budget: Duration::from_millis(50),
        }
    }
}

/// A received multipart upload: raw bytes plus the declared content type.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct ImportService {
    employees: Arc<dyn EmployeeRepository>,
    departments: Arc<dyn DepartmentDirectory>,
    sequences: Arc<dyn SequenceStore>,
    limits: ImportLimits,
}

impl ImportService {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        departments: Arc<dyn DepartmentDirectory>,
        sequences: Arc<dyn SequenceStore>,
        limits: ImportLimits,
    ) -> Self {
        Self {
            employees,
            departments,
            sequences,
            limits,
        }
    }

    /// Dry run: parse, validate, and batch-check without touching the store
    /// or the sequence counters.
    pub async fn validate_file(
        &self,
        tenant: &TenantId,
        upload: &FileUpload,
    ) -> Result<ValidationSummary, DomainError> {
        let (total_rows, outcome) = self.stage_batch(tenant, upload).await?;
        let available = self.departments.department_names(tenant).await?;

        info!(
            tenant = %tenant,
            file = upload.file_name.as_deref().unwrap_or("-"),
            total_rows,
            eligible = outcome.eligible.len(),
            "bulk import validated (dry run)"
        );

        Ok(report::build_validation_summary(
            total_rows,
            outcome.eligible.len() as u32,
            outcome.errors,
            available,
        ))
    }

    pub async fn import_file(
        &self,
        tenant: &TenantId,
        upload: &FileUpload,
    ) -> Result<UploadReport, DomainError> {
        let (total_rows, outcome) = self.stage_batch(tenant, upload).await?;

        let deadline =
            Instant::now() + self.limits.base_budget + self.limits.per_row_budget * total_rows;
        let ingested = ingest::ingest_rows(
            tenant,
            outcome.eligible,
            self.sequences.as_ref(),
            self.employees.as_ref(),
            deadline,
        )
        .await;

        let mut errors = outcome.errors;
        errors.extend(ingested.errors);
        let report = report::build_report(total_rows, errors, ingested.created);

        info!(
            tenant = %tenant,
            file = upload.file_name.as_deref().unwrap_or("-"),
            total_rows = report.total_rows,
            created = report.success_count(),
            failed = report.failed_count(),
            "bulk import finished"
        );

        Ok(report)
    }

    /// Preview of the next employee code. Not a reservation: a concurrent
    /// import or manual create can take the previewed code first.
    pub async fn preview_next_code(&self, tenant: &TenantId) -> Result<String, DomainError> {
        let next = self.sequences.peek(tenant, EMPLOYEE_ENTITY_CLASS).await?;
        Ok(format_employee_code(next))
    }

    async fn stage_batch(
        &self,
        tenant: &TenantId,
        upload: &FileUpload,
    ) -> Result<(u32, BatchOutcome), DomainError> {
        let limits = ParseLimits {
            max_file_bytes: self.limits.max_upload_bytes,
            max_rows: self.limits.max_rows,
        };
        let rows = parser::parse_upload(&upload.bytes, &upload.content_type, &limits)?;
        let total_rows = rows.len() as u32;

        let checked = rows
            .iter()
            .map(|row| CheckedRow::new(row, validator::validate(row)))
            .collect();
        let outcome = batch::check_batch(
            tenant,
            checked,
            self.employees.as_ref(),
            self.departments.as_ref(),
        )
        .await?;

        Ok((total_rows, outcome))
    }
}
