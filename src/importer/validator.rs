//! Per-row schema validation.
//!
//! Pure with respect to the row: no lookups, no shared state, so rows can be
//! checked in any order with identical results. Batch-wide and store-wide
//! rules live in [`batch`](super::batch).

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::{
    EmployeeDraft, EmploymentType, Gender, ImportRow, MaritalStatus, RowError, RowErrorKind,
};

pub mod columns {
    pub const FIRST_NAME: &str = "first_name";
    pub const MIDDLE_NAME: &str = "middle_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    pub const GENDER: &str = "gender";
    pub const DEPARTMENT: &str = "department";
    pub const JOB_TITLE: &str = "job_title";
    pub const HIRE_DATE: &str = "hire_date";
    pub const EMPLOYMENT_TYPE: &str = "employment_type";
    pub const MARITAL_STATUS: &str = "marital_status";
    pub const SALARY: &str = "salary";
    pub const ADDRESS: &str = "address";
}

pub struct ColumnSpec {
    pub name: &'static str,
    pub required: bool,
    pub format: &'static str,
    pub example: &'static str,
}

/// The import schema, shared with the template workbook.
pub const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: columns::FIRST_NAME,
        required: true,
        format: "free text",
        example: "Ada",
    },
    ColumnSpec {
        name: columns::MIDDLE_NAME,
        required: false,
        format: "free text",
        example: "",
    },
    ColumnSpec {
        name: columns::LAST_NAME,
        required: true,
        format: "free text",
        example: "Lovelace",
    },
    ColumnSpec {
        name: columns::EMAIL,
        required: true,
        format: "email address, unique per tenant",
        example: "ada.lovelace@example.com",
    },
    ColumnSpec {
        name: columns::PHONE,
        required: true,
        format: "free text",
        example: "+44 20 7946 0958",
    },
    ColumnSpec {
        name: columns::DATE_OF_BIRTH,
        required: true,
        format: "ISO date (YYYY-MM-DD)",
        example: "1990-12-10",
    },
    ColumnSpec {
        name: columns::GENDER,
        required: true,
        format: "one of: male, female, other",
        example: "female",
    },
    ColumnSpec {
        name: columns::DEPARTMENT,
        required: true,
        format: "existing department name",
        example: "Engineering",
    },
    ColumnSpec {
        name: columns::JOB_TITLE,
        required: true,
        format: "free text",
        example: "Software Engineer",
    },
    ColumnSpec {
        name: columns::HIRE_DATE,
        required: true,
        format: "ISO date (YYYY-MM-DD)",
        example: "2024-02-01",
    },
    ColumnSpec {
        name: columns::EMPLOYMENT_TYPE,
        required: false,
        format: "one of: full_time, part_time, contract, intern (default full_time)",
        example: "full_time",
    },
    ColumnSpec {
        name: columns::MARITAL_STATUS,
        required: false,
        format: "one of: single, married, divorced, widowed",
        example: "single",
    },
    ColumnSpec {
        name: columns::SALARY,
        required: false,
        format: "non-negative number",
        example: "70000",
    },
    ColumnSpec {
        name: columns::ADDRESS,
        required: false,
        format: "free text",
        example: "12 Analytical Way, London",
    },
];

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

/// Outcome of validating one row: every field error found, plus the typed
/// draft iff there were none.
#[derive(Debug)]
pub struct RowCheck {
    pub errors: Vec<RowError>,
    pub draft: Option<EmployeeDraft>,
}

pub fn validate(row: &ImportRow) -> RowCheck {
    let mut errors = Vec::new();
    let ordinal = row.ordinal;

    let first_name = required_text(row, columns::FIRST_NAME, &mut errors);
    let last_name = required_text(row, columns::LAST_NAME, &mut errors);
    let phone = required_text(row, columns::PHONE, &mut errors);
    let job_title = required_text(row, columns::JOB_TITLE, &mut errors);
    let department = required_text(row, columns::DEPARTMENT, &mut errors);

    let email = match row.field(columns::EMAIL) {
        None => {
            errors.push(RowError::missing(ordinal, columns::EMAIL));
            None
        }
        Some(raw) if !EMAIL_PATTERN.is_match(raw) => {
            errors.push(
                RowError::new(
                    ordinal,
                    columns::EMAIL,
                    RowErrorKind::InvalidEmail,
                    "not a valid email address",
                )
                .with_value(raw),
            );
            None
        }
        Some(raw) => Some(raw.to_lowercase()),
    };

    let date_of_birth = required_date(row, columns::DATE_OF_BIRTH, &mut errors);
    let hire_date = required_date(row, columns::HIRE_DATE, &mut errors);

    let gender = match row.field(columns::GENDER) {
        None => {
            errors.push(RowError::missing(ordinal, columns::GENDER));
            None
        }
        Some(raw) => match Gender::parse(raw) {
            Some(gender) => Some(gender),
            None => {
                errors.push(unknown_value(ordinal, columns::GENDER, raw, Gender::ALLOWED));
                None
            }
        },
    };

    let employment_type = match row.field(columns::EMPLOYMENT_TYPE) {
        None => Some(EmploymentType::default()),
        Some(raw) => match EmploymentType::parse(raw) {
            Some(employment_type) => Some(employment_type),
            None => {
                errors.push(unknown_value(
                    ordinal,
                    columns::EMPLOYMENT_TYPE,
                    raw,
                    EmploymentType::ALLOWED,
                ));
                None
            }
        },
    };

    let marital_status = match row.field(columns::MARITAL_STATUS) {
        None => Some(None),
        Some(raw) => match MaritalStatus::parse(raw) {
            Some(status) => Some(Some(status)),
            None => {
                errors.push(unknown_value(
                    ordinal,
                    columns::MARITAL_STATUS,
                    raw,
                    MaritalStatus::ALLOWED,
                ));
                None
            }
        },
    };

    let salary = match row.field(columns::SALARY) {
        None => Some(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value >= 0.0 => Some(Some(value)),
            _ => {
                errors.push(
                    RowError::new(
                        ordinal,
                        columns::SALARY,
                        RowErrorKind::InvalidNumber,
                        "must be a non-negative number",
                    )
                    .with_value(raw),
                );
                None
            }
        },
    };

    let draft = match (
        first_name,
        last_name,
        phone,
        job_title,
        department,
        email,
        date_of_birth,
        hire_date,
        gender,
        employment_type,
        marital_status,
        salary,
    ) {
        (
            Some(first_name),
            Some(last_name),
            Some(phone),
            Some(job_title),
            Some(department),
            Some(email),
            Some(date_of_birth),
            Some(hire_date),
            Some(gender),
            Some(employment_type),
            Some(marital_status),
            Some(salary),
        ) if errors.is_empty() => Some(EmployeeDraft {
            first_name,
            middle_name: row.field(columns::MIDDLE_NAME).map(str::to_string),
            last_name,
            email,
            phone,
            date_of_birth,
            gender,
            department,
            job_title,
            hire_date,
            employment_type,
            marital_status,
            salary,
            address: row.field(columns::ADDRESS).map(str::to_string),
        }),
        _ => None,
    };

    RowCheck { errors, draft }
}

fn required_text(row: &ImportRow, column: &str, errors: &mut Vec<RowError>) -> Option<String> {
    match row.field(column) {
        Some(value) => Some(value.to_string()),
        None => {
            errors.push(RowError::missing(row.ordinal, column));
            None
        }
    }
}

fn required_date(row: &ImportRow, column: &str, errors: &mut Vec<RowError>) -> Option<NaiveDate> {
    let Some(raw) = row.field(column) else {
        errors.push(RowError::missing(row.ordinal, column));
        return None;
    };

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(
                RowError::new(
                    row.ordinal,
                    column,
                    RowErrorKind::InvalidDate,
                    "expected an ISO date (YYYY-MM-DD)",
                )
                .with_value(raw),
            );
            None
        }
    }
}

fn unknown_value(row: u32, column: &str, raw: &str, allowed: &[&str]) -> RowError {
    RowError::new(
        row,
        column,
        RowErrorKind::UnknownValue,
        format!("must be one of: {}", allowed.join(", ")),
    )
    .with_value(raw)
}
