use tokio::time::Instant;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    CreatedEmployee, DomainError, EMPLOYEE_ENTITY_CLASS, NewEmployee, RowError, RowErrorKind,
    TenantId, format_employee_code,
};
use crate::importer::batch::EligibleRow;
use crate::importer::validator::columns;
use crate::infrastructure::EmployeeRepository;
use crate::sequence::SequenceStore;

#[derive(Debug)]
pub struct IngestOutcome {
    pub created: Vec<CreatedEmployee>,
    pub errors: Vec<RowError>,
}

/// Persists eligible rows one at a time, in file order, so codes are
/// assigned in the same relative order as the source spreadsheet.
///
/// A row-level conflict (a concurrent writer winning the race after the
/// batch check) demotes to `create_failed` and the fold continues; the
/// sequence number allocated for such a row stays burned. An exhausted
/// deadline fails the remaining rows as `timeout`; an infrastructure
/// failure fails them as `aborted`. In every case the rows already created
/// stay in the outcome.
pub async fn ingest_rows(
    tenant: &TenantId,
    eligible: Vec<EligibleRow>,
    sequences: &dyn SequenceStore,
    employees: &dyn EmployeeRepository,
    deadline: Instant,
) -> IngestOutcome {
    let mut created = Vec::new();
    let mut errors = Vec::new();
    let mut pending = eligible.into_iter();

    while let Some(row) = pending.next() {
        if Instant::now() >= deadline {
            errors.push(timeout_error(row.ordinal));
            errors.extend(pending.map(|rest| timeout_error(rest.ordinal)));
            break;
        }

        let seq = match sequences.allocate(tenant, EMPLOYEE_ENTITY_CLASS).await {
            Ok(seq) => seq,
            Err(err) => {
                warn!(
                    tenant = %tenant,
                    row = row.ordinal,
                    error = %err,
                    "sequence allocation failed, aborting remaining rows"
                );
                errors.push(aborted_error(row.ordinal, &err));
                errors.extend(pending.map(|rest| aborted_error(rest.ordinal, &err)));
                break;
            }
        };

        let code = format_employee_code(seq);
        let display_name = row.draft.display_name();
        let email = row.draft.email.clone();
        let new_employee = NewEmployee {
            id: Uuid::new_v4(),
            tenant: tenant.clone(),
            code: code.clone(),
            draft: row.draft,
        };

        match employees.insert(new_employee).await {
            Ok(_) => created.push(CreatedEmployee { code, display_name }),
            Err(DomainError::Conflict(message)) => {
                // lost the race to a concurrent writer; the number is burned
                errors.push(
                    RowError::new(row.ordinal, columns::EMAIL, RowErrorKind::CreateFailed, message)
                        .with_value(email),
                );
            }
            Err(err) => {
                warn!(
                    tenant = %tenant,
                    row = row.ordinal,
                    error = %err,
                    "employee insert failed, aborting remaining rows"
                );
                errors.push(aborted_error(row.ordinal, &err));
                errors.extend(pending.map(|rest| aborted_error(rest.ordinal, &err)));
                break;
            }
        }
    }

    IngestOutcome { created, errors }
}

fn timeout_error(ordinal: u32) -> RowError {
    RowError::new(
        ordinal,
        "row",
        RowErrorKind::Timeout,
        "import deadline exceeded before this row was processed",
    )
}

fn aborted_error(ordinal: u32, err: &DomainError) -> RowError {
    RowError::new(
        ordinal,
        "row",
        RowErrorKind::Aborted,
        format!("import aborted: {err}"),
    )
}
