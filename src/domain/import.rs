use std::collections::HashMap;

use serde::Serialize;

/// One parsed spreadsheet line, untyped until the validator runs.
///
/// Ordinals are 1-based and count the header row, so the first data row is
/// ordinal 2. Blank cells are treated as absent fields.
#[derive(Debug, Clone)]
pub struct ImportRow {
    pub ordinal: u32,
    pub fields: HashMap<String, String>,
}

impl ImportRow {
    pub fn new(ordinal: u32) -> Self {
        Self {
            ordinal,
            fields: HashMap::new(),
        }
    }

    /// Returns the trimmed cell value, treating blank cells as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    MissingField,
    InvalidEmail,
    InvalidDate,
    InvalidNumber,
    UnknownValue,
    ReferenceNotFound,
    DuplicateInFile,
    AlreadyExists,
    CreateFailed,
    Timeout,
    Aborted,
}

/// A per-row failure. Any number of these can attach to one row; a row with
/// at least one is excluded from ingestion but never stops its siblings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub row: u32,
    pub field: String,
    pub kind: RowErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RowError {
    pub fn new(
        row: u32,
        field: impl Into<String>,
        kind: RowErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field: field.into(),
            kind,
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn missing(row: u32, field: &str) -> Self {
        Self::new(
            row,
            field,
            RowErrorKind::MissingField,
            format!("required column '{field}' is missing or blank"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedEmployee {
    pub code: String,
    pub display_name: String,
}

/// Aggregate outcome of one import call. Derived counts keep the
/// report arithmetic in one place: `success_count == created.len()` and
/// `failed_count + success_count == total_rows` always hold.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub total_rows: u32,
    pub errors: Vec<RowError>,
    pub created: Vec<CreatedEmployee>,
}

impl UploadReport {
    pub fn success_count(&self) -> u32 {
        self.created.len() as u32
    }

    pub fn failed_count(&self) -> u32 {
        self.total_rows - self.success_count()
    }

    pub fn succeeded(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Outcome of the dry-run path: everything up to the batch checks, with no
/// persistence side effects.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub total_rows: u32,
    pub eligible_rows: u32,
    pub errors: Vec<RowError>,
    pub available_departments: Vec<String>,
}

impl ValidationSummary {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
