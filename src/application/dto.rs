use serde::Serialize;

use crate::domain::{CreatedEmployee, RowError, UploadReport, ValidationSummary};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BulkValidateResponse {
    pub valid: bool,
    pub total_rows: u32,
    pub valid_rows: u32,
    pub errors: Vec<RowError>,
    pub available_departments: Vec<String>,
}

impl From<ValidationSummary> for BulkValidateResponse {
    fn from(value: ValidationSummary) -> Self {
        let valid = value.is_valid();
        Self {
            valid,
            total_rows: value.total_rows,
            valid_rows: value.eligible_rows,
            errors: value.errors,
            available_departments: value.available_departments,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BulkImportResponse {
    pub success: bool,
    pub total_rows: u32,
    pub success_count: u32,
    pub failed_count: u32,
    pub errors: Vec<RowError>,
    pub created_employees: Vec<CreatedEmployee>,
}

impl From<UploadReport> for BulkImportResponse {
    fn from(value: UploadReport) -> Self {
        let success = value.succeeded();
        let success_count = value.success_count();
        let failed_count = value.failed_count();
        Self {
            success,
            total_rows: value.total_rows,
            success_count,
            failed_count,
            errors: value.errors,
            created_employees: value.created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NextCodeResponse {
    pub next_code: String,
}
