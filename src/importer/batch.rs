//! Batch-wide consistency checks: the only stage that reads shared state.
//!
//! Issues exactly one reference-data fetch and one batched existence query
//! per call, so cost stays O(rows) beyond the in-memory duplicate grouping.

use std::collections::{HashMap, HashSet};

use crate::domain::{DomainError, EmployeeDraft, ImportRow, RowError, RowErrorKind, TenantId};
use crate::importer::validator::{RowCheck, columns};
use crate::infrastructure::{DepartmentDirectory, EmployeeRepository};

/// A row plus everything the per-row validator learned about it.
#[derive(Debug)]
pub struct CheckedRow {
    pub ordinal: u32,
    /// Lowercased business key, when the row carries one at all. Grouping
    /// uses the raw cell so duplicate detection still works on rows that
    /// failed other field checks.
    pub email: Option<String>,
    pub department: Option<String>,
    pub draft: Option<EmployeeDraft>,
    pub errors: Vec<RowError>,
}

impl CheckedRow {
    pub fn new(row: &ImportRow, check: RowCheck) -> Self {
        Self {
            ordinal: row.ordinal,
            email: row.field(columns::EMAIL).map(|value| value.to_lowercase()),
            department: row.field(columns::DEPARTMENT).map(str::to_string),
            draft: check.draft,
            errors: check.errors,
        }
    }
}

/// A row that survived every check and is queued for persistence.
#[derive(Debug)]
pub struct EligibleRow {
    pub ordinal: u32,
    pub draft: EmployeeDraft,
}

#[derive(Debug)]
pub struct BatchOutcome {
    /// Ingest-ready rows, still in file order.
    pub eligible: Vec<EligibleRow>,
    /// Every accumulated error, validator stage included.
    pub errors: Vec<RowError>,
}

pub async fn check_batch(
    tenant: &TenantId,
    mut rows: Vec<CheckedRow>,
    employees: &dyn EmployeeRepository,
    departments: &dyn DepartmentDirectory,
) -> Result<BatchOutcome, DomainError> {
    let known_departments: HashSet<String> = departments
        .department_names(tenant)
        .await?
        .into_iter()
        .map(|name| name.to_lowercase())
        .collect();

    for row in &mut rows {
        let Some(department) = &row.department else {
            continue;
        };
        if !known_departments.contains(&department.to_lowercase()) {
            row.errors.push(
                RowError::new(
                    row.ordinal,
                    columns::DEPARTMENT,
                    RowErrorKind::ReferenceNotFound,
                    "department does not exist",
                )
                .with_value(department.clone()),
            );
        }
    }

    // symmetric duplicate detection: every member of a duplicated group is
    // flagged, so fixing one row clears the error on the other
    let mut ordinals_by_email: HashMap<String, Vec<u32>> = HashMap::new();
    for row in &rows {
        if let Some(email) = &row.email {
            ordinals_by_email
                .entry(email.clone())
                .or_default()
                .push(row.ordinal);
        }
    }
    let duplicated: HashSet<&String> = ordinals_by_email
        .iter()
        .filter(|(_, ordinals)| ordinals.len() > 1)
        .map(|(email, _)| email)
        .collect();

    for row in &mut rows {
        let Some(email) = &row.email else {
            continue;
        };
        let ordinals = &ordinals_by_email[email];
        if ordinals.len() > 1 {
            let others: Vec<String> = ordinals
                .iter()
                .filter(|ordinal| **ordinal != row.ordinal)
                .map(|ordinal| ordinal.to_string())
                .collect();
            row.errors.push(
                RowError::new(
                    row.ordinal,
                    columns::EMAIL,
                    RowErrorKind::DuplicateInFile,
                    format!("duplicates row(s) {}", others.join(", ")),
                )
                .with_value(email.clone()),
            );
        }
    }

    // one batched existence query for the keys not already duplicated in-file
    let candidates: Vec<String> = rows
        .iter()
        .filter_map(|row| row.email.as_ref())
        .filter(|email| !duplicated.contains(email))
        .cloned()
        .collect();
    let taken = employees.emails_in_use(tenant, &candidates).await?;

    for row in &mut rows {
        let Some(email) = &row.email else {
            continue;
        };
        if taken.contains(email) {
            row.errors.push(
                RowError::new(
                    row.ordinal,
                    columns::EMAIL,
                    RowErrorKind::AlreadyExists,
                    "an employee with this email already exists",
                )
                .with_value(email.clone()),
            );
        }
    }

    let mut eligible = Vec::new();
    let mut errors = Vec::new();
    for row in rows {
        if row.errors.is_empty() {
            if let Some(draft) = row.draft {
                eligible.push(EligibleRow {
                    ordinal: row.ordinal,
                    draft,
                });
            }
        } else {
            errors.extend(row.errors);
        }
    }

    Ok(BatchOutcome { eligible, errors })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::domain::NewEmployee;
    use crate::importer::validator;
    use crate::infrastructure::{InMemoryDepartmentDirectory, InMemoryEmployeeRepository};

    fn tenant() -> TenantId {
        TenantId::new("acme").unwrap()
    }

    fn import_row(ordinal: u32, email: &str, department: &str) -> ImportRow {
        let mut row = ImportRow::new(ordinal);
        for (name, value) in [
            (columns::FIRST_NAME, "Ada"),
            (columns::LAST_NAME, "Lovelace"),
            (columns::EMAIL, email),
            (columns::PHONE, "+44 20 7946 0958"),
            (columns::DATE_OF_BIRTH, "1990-12-10"),
            (columns::GENDER, "female"),
            (columns::DEPARTMENT, department),
            (columns::JOB_TITLE, "Engineer"),
            (columns::HIRE_DATE, "2024-02-01"),
        ] {
            row.fields.insert(name.to_string(), value.to_string());
        }
        row
    }

    fn checked(row: &ImportRow) -> CheckedRow {
        CheckedRow::new(row, validator::validate(row))
    }

    fn directory() -> Arc<InMemoryDepartmentDirectory> {
        Arc::new(InMemoryDepartmentDirectory::new(vec![
            "Engineering".to_string(),
            "Sales".to_string(),
        ]))
    }

    #[tokio::test]
    async fn unknown_department_is_flagged_without_blocking_others() {
        let employees = InMemoryEmployeeRepository::new();
        let rows = vec![
            checked(&import_row(2, "ada@example.com", "Engineering")),
            checked(&import_row(3, "alan@example.com", "Ghost Department")),
        ];

        let outcome = check_batch(&tenant(), rows, &employees, directory().as_ref())
            .await
            .unwrap();

        assert_eq!(outcome.eligible.len(), 1);
        assert_eq!(outcome.eligible[0].ordinal, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, RowErrorKind::ReferenceNotFound);
        assert_eq!(outcome.errors[0].value.as_deref(), Some("Ghost Department"));
    }

    #[tokio::test]
    async fn department_match_is_case_insensitive() {
        let employees = InMemoryEmployeeRepository::new();
        let rows = vec![checked(&import_row(2, "ada@example.com", "engineering"))];

        let outcome = check_batch(&tenant(), rows, &employees, directory().as_ref())
            .await
            .unwrap();

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.eligible.len(), 1);
    }

    #[tokio::test]
    async fn duplicates_flag_every_member_of_the_group() {
        let employees = InMemoryEmployeeRepository::new();
        let rows = vec![
            checked(&import_row(2, "ada@example.com", "Engineering")),
            checked(&import_row(3, "Ada@Example.com", "Engineering")),
            checked(&import_row(4, "alan@example.com", "Engineering")),
        ];

        let outcome = check_batch(&tenant(), rows, &employees, directory().as_ref())
            .await
            .unwrap();

        assert_eq!(outcome.eligible.len(), 1);
        assert_eq!(outcome.eligible[0].ordinal, 4);

        let duplicate_rows: Vec<u32> = outcome
            .errors
            .iter()
            .filter(|error| error.kind == RowErrorKind::DuplicateInFile)
            .map(|error| error.row)
            .collect();
        assert_eq!(duplicate_rows, vec![2, 3]);
        assert!(outcome.errors.iter().any(|error| error.row == 2
            && error.message.contains('3')));
    }

    #[tokio::test]
    async fn existing_employees_mark_rows_already_exists() {
        let employees = InMemoryEmployeeRepository::new();
        let row = import_row(2, "ada@example.com", "Engineering");
        let check = validator::validate(&row);
        employees
            .insert(NewEmployee {
                id: Uuid::new_v4(),
                tenant: tenant(),
                code: "EMP00001".to_string(),
                draft: check.draft.unwrap(),
            })
            .await
            .unwrap();

        let rows = vec![
            checked(&import_row(2, "ada@example.com", "Engineering")),
            checked(&import_row(3, "alan@example.com", "Engineering")),
        ];
        let outcome = check_batch(&tenant(), rows, &employees, directory().as_ref())
            .await
            .unwrap();

        assert_eq!(outcome.eligible.len(), 1);
        assert_eq!(outcome.eligible[0].ordinal, 3);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, RowErrorKind::AlreadyExists);
    }
}
