use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use staffhub_import::application::import_service::{FileUpload, ImportLimits, ImportService};
use staffhub_import::domain::{DomainError, EmployeeDraft, EmploymentType, Gender, NewEmployee, RowErrorKind, TenantId};
use staffhub_import::importer::batch::EligibleRow;
use staffhub_import::importer::ingest;
use staffhub_import::infrastructure::{
    EmployeeRepository, InMemoryDepartmentDirectory, InMemoryEmployeeRepository,
};
use staffhub_import::sequence::{InMemorySequenceStore, SequenceStore};
use tokio::time::Instant;
use uuid::Uuid;

const HEADER: &str =
    "first_name,last_name,email,phone,date_of_birth,gender,department,job_title,hire_date";

struct Harness {
    service: ImportService,
    employees: Arc<InMemoryEmployeeRepository>,
    sequences: Arc<InMemorySequenceStore>,
}

fn setup() -> Harness {
    setup_with_limits(ImportLimits::default())
}

fn setup_with_limits(limits: ImportLimits) -> Harness {
    let employees = Arc::new(InMemoryEmployeeRepository::new());
    let departments = Arc::new(InMemoryDepartmentDirectory::new(vec![
        "Engineering".to_string(),
        "Sales".to_string(),
    ]));
    let sequences = Arc::new(InMemorySequenceStore::new());
    let service = ImportService::new(
        employees.clone(),
        departments,
        sequences.clone(),
        limits,
    );

    Harness {
        service,
        employees,
        sequences,
    }
}

fn tenant() -> TenantId {
    TenantId::new("acme").expect("tenant id")
}

fn csv_upload(content: String) -> FileUpload {
    FileUpload {
        file_name: Some("employees.csv".to_string()),
        content_type: "text/csv".to_string(),
        bytes: content.into_bytes(),
    }
}

fn data_row(first: &str, last: &str, email: &str, department: &str) -> String {
    format!("{first},{last},{email},+1 555 0100,1990-01-15,female,{department},Engineer,2024-02-01")
}

fn valid_file(count: usize) -> FileUpload {
    let mut lines = vec![HEADER.to_string()];
    for n in 1..=count {
        lines.push(data_row(
            &format!("First{n}"),
            &format!("Last{n}"),
            &format!("person{n}@example.com"),
            "Engineering",
        ));
    }
    csv_upload(lines.join("\n"))
}

fn draft(email: &str) -> EmployeeDraft {
    EmployeeDraft {
        first_name: "Ada".to_string(),
        middle_name: None,
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        phone: "+1 555 0100".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).expect("date"),
        gender: Gender::Female,
        department: "Engineering".to_string(),
        job_title: "Engineer".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"),
        employment_type: EmploymentType::FullTime,
        marital_status: None,
        salary: None,
        address: None,
    }
}

#[tokio::test]
async fn mixed_failure_file_reports_every_error_and_ingests_nothing() {
    let harness = setup();
    let acme = tenant();

    // data rows at ordinals 2, 3, 4: ordinal 3 has a malformed email and
    // ordinal 4 duplicates ordinal 2's email
    let upload = csv_upload(format!(
        "{HEADER}\n{}\n{}\n{}",
        data_row("Ada", "Lovelace", "ada@example.com", "Engineering"),
        data_row("Alan", "Turing", "not-an-email", "Engineering"),
        data_row("Grace", "Hopper", "ada@example.com", "Engineering"),
    ));

    let summary = harness
        .service
        .validate_file(&acme, &upload)
        .await
        .expect("validate");

    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.eligible_rows, 0);
    assert!(!summary.is_valid());
    assert_eq!(summary.errors.len(), 3);

    let invalid: Vec<u32> = summary
        .errors
        .iter()
        .filter(|error| error.kind == RowErrorKind::InvalidEmail)
        .map(|error| error.row)
        .collect();
    assert_eq!(invalid, vec![3]);

    let duplicates: Vec<u32> = summary
        .errors
        .iter()
        .filter(|error| error.kind == RowErrorKind::DuplicateInFile)
        .map(|error| error.row)
        .collect();
    assert_eq!(duplicates, vec![2, 4]);

    // dry run touched neither the store nor the counters
    assert_eq!(harness.employees.count(&acme).await, 0);
    assert_eq!(
        harness.sequences.peek(&acme, "employee").await.unwrap(),
        1
    );
}

#[tokio::test]
async fn same_file_twice_reports_every_row_already_exists() {
    let harness = setup();
    let acme = tenant();
    let upload = valid_file(5);

    let first = harness
        .service
        .import_file(&acme, &upload)
        .await
        .expect("first import");

    assert!(first.succeeded());
    assert_eq!(first.success_count(), 5);
    let codes: Vec<&str> = first.created.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(
        codes,
        vec!["EMP00001", "EMP00002", "EMP00003", "EMP00004", "EMP00005"]
    );
    let stored = harness
        .employees
        .find_by_code(&acme, "EMP00001")
        .await
        .expect("first created employee");
    assert_eq!(stored.email, "person1@example.com");

    let second = harness
        .service
        .import_file(&acme, &upload)
        .await
        .expect("second import");

    assert_eq!(second.success_count(), 0);
    assert_eq!(second.failed_count(), 5);
    assert_eq!(second.errors.len(), 5);
    assert!(
        second
            .errors
            .iter()
            .all(|error| error.kind == RowErrorKind::AlreadyExists)
    );
    assert_eq!(harness.employees.count(&acme).await, 5);
}

#[tokio::test]
async fn unknown_department_rejects_only_that_row() {
    let harness = setup();
    let acme = tenant();

    let upload = csv_upload(format!(
        "{HEADER}\n{}\n{}",
        data_row("Ada", "Lovelace", "ada@example.com", "Engineering"),
        data_row("Alan", "Turing", "alan@example.com", "Warp Drive"),
    ));

    let report = harness
        .service
        .import_file(&acme, &upload)
        .await
        .expect("import");

    assert_eq!(report.success_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, RowErrorKind::ReferenceNotFound);
    assert_eq!(report.errors[0].value.as_deref(), Some("Warp Drive"));
    assert_eq!(report.created[0].code, "EMP00001");
}

#[tokio::test]
async fn validate_is_idempotent() {
    let harness = setup();
    let acme = tenant();

    let upload = csv_upload(format!(
        "{HEADER}\n{}\n{}",
        data_row("Ada", "Lovelace", "ada@example.com", "Ghost Department"),
        data_row("Alan", "Turing", "not-an-email", "Engineering"),
    ));

    let first = harness
        .service
        .validate_file(&acme, &upload)
        .await
        .expect("first validate");
    let second = harness
        .service
        .validate_file(&acme, &upload)
        .await
        .expect("second validate");

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn report_arithmetic_always_holds() {
    let harness = setup();
    let acme = tenant();

    let upload = csv_upload(format!(
        "{HEADER}\n{}\n{}\n{}",
        data_row("Ada", "Lovelace", "ada@example.com", "Engineering"),
        data_row("Alan", "Turing", "broken", "Engineering"),
        data_row("Grace", "Hopper", "grace@example.com", "Sales"),
    ));

    let report = harness
        .service
        .import_file(&acme, &upload)
        .await
        .expect("import");

    assert_eq!(report.success_count() as usize, report.created.len());
    assert_eq!(report.failed_count() + report.success_count(), report.total_rows);
    assert_eq!(harness.employees.count(&acme).await, report.created.len());
}

#[tokio::test]
async fn format_errors_are_fatal_before_any_row_runs() {
    let harness = setup();
    let acme = tenant();

    let pdf = FileUpload {
        file_name: Some("employees.pdf".to_string()),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
    };
    assert!(matches!(
        harness.service.import_file(&acme, &pdf).await,
        Err(DomainError::UnsupportedFormat(_))
    ));

    let header_only = csv_upload(HEADER.to_string());
    assert!(matches!(
        harness.service.validate_file(&acme, &header_only).await,
        Err(DomainError::EmptyFile)
    ));

    assert_eq!(harness.employees.count(&acme).await, 0);
}

#[tokio::test]
async fn row_cap_rejects_the_whole_file() {
    let harness = setup_with_limits(ImportLimits {
        max_rows: 2,
        ..ImportLimits::default()
    });
    let acme = tenant();

    let err = harness
        .service
        .import_file(&acme, &valid_file(3))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::TooManyRows { actual: 3, limit: 2 }));
    assert_eq!(harness.employees.count(&acme).await, 0);
}

#[tokio::test]
async fn create_race_burns_the_sequence_number_and_continues() {
    let harness = setup();
    let acme = tenant();

    // another writer grabbed this email after the batch check would have run
    harness
        .employees
        .insert(NewEmployee {
            id: Uuid::new_v4(),
            tenant: acme.clone(),
            code: "EMP99999".to_string(),
            draft: draft("taken@example.com"),
        })
        .await
        .expect("seed insert");

    let eligible = vec![
        EligibleRow {
            ordinal: 2,
            draft: draft("taken@example.com"),
        },
        EligibleRow {
            ordinal: 3,
            draft: draft("fresh@example.com"),
        },
    ];

    let outcome = ingest::ingest_rows(
        &acme,
        eligible,
        harness.sequences.as_ref(),
        harness.employees.as_ref(),
        Instant::now() + Duration::from_secs(5),
    )
    .await;

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row, 2);
    assert_eq!(outcome.errors[0].kind, RowErrorKind::CreateFailed);

    // number 1 was burned by the failed row; the survivor carries the gap
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].code, "EMP00002");
    assert_eq!(
        harness.sequences.peek(&acme, "employee").await.unwrap(),
        3
    );
}

#[tokio::test]
async fn exhausted_deadline_fails_remaining_rows_as_timeout() {
    let harness = setup();
    let acme = tenant();

    let eligible = vec![
        EligibleRow {
            ordinal: 2,
            draft: draft("one@example.com"),
        },
        EligibleRow {
            ordinal: 3,
            draft: draft("two@example.com"),
        },
    ];

    let outcome = ingest::ingest_rows(
        &acme,
        eligible,
        harness.sequences.as_ref(),
        harness.employees.as_ref(),
        Instant::now() - Duration::from_millis(1),
    )
    .await;

    assert!(outcome.created.is_empty());
    assert_eq!(outcome.errors.len(), 2);
    assert!(
        outcome
            .errors
            .iter()
            .all(|error| error.kind == RowErrorKind::Timeout)
    );
    assert_eq!(harness.employees.count(&acme).await, 0);
}

#[tokio::test]
async fn next_code_preview_follows_allocations() {
    let harness = setup();
    let acme = tenant();

    assert_eq!(
        harness.service.preview_next_code(&acme).await.unwrap(),
        "EMP00001"
    );

    harness
        .service
        .import_file(&acme, &valid_file(2))
        .await
        .expect("import");

    assert_eq!(
        harness.service.preview_next_code(&acme).await.unwrap(),
        "EMP00003"
    );
}

#[tokio::test]
async fn tenants_are_fully_isolated() {
    let harness = setup();
    let acme = tenant();
    let globex = TenantId::new("globex").expect("tenant id");

    let upload = valid_file(2);
    harness
        .service
        .import_file(&acme, &upload)
        .await
        .expect("acme import");

    // same file, different tenant: no conflicts and its own code range
    let report = harness
        .service
        .import_file(&globex, &upload)
        .await
        .expect("globex import");

    assert!(report.succeeded());
    assert_eq!(report.created[0].code, "EMP00001");
    assert_eq!(harness.employees.count(&acme).await, 2);
    assert_eq!(harness.employees.count(&globex).await, 2);
}
