use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Entity class under which employee codes are sequenced.
pub const EMPLOYEE_ENTITY_CLASS: &str = "employee";

pub const EMPLOYEE_CODE_PREFIX: &str = "EMP";

/// Formats a sequence number as the human-visible employee code
/// (`EMP00007`). Pads to five digits and grows past them rather than
/// wrapping.
pub fn format_employee_code(seq: u64) -> String {
    format!("{EMPLOYEE_CODE_PREFIX}{seq:05}")
}

/// An isolated organization's data partition. Every record and counter is
/// keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Returns `None` for blank input; tenant identity always comes from an
    /// upstream header and a blank one means the caller forgot it.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALLOWED: &'static [&'static str] = &["male", "female", "other"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Intern,
}

impl EmploymentType {
    pub const ALLOWED: &'static [&'static str] = &["full_time", "part_time", "contract", "intern"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "full_time" => Some(Self::FullTime),
            "part_time" => Some(Self::PartTime),
            "contract" => Some(Self::Contract),
            "intern" => Some(Self::Intern),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub const ALLOWED: &'static [&'static str] = &["single", "married", "divorced", "widowed"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "single" => Some(Self::Single),
            "married" => Some(Self::Married),
            "divorced" => Some(Self::Divorced),
            "widowed" => Some(Self::Widowed),
            _ => None,
        }
    }
}

/// Validated field set of one employee, before an id and code are assigned.
/// Produced by the row validator; rows stay untyped string maps until then.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Business email, normalized to lowercase. Unique per tenant.
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub department: String,
    pub job_title: String,
    pub hire_date: NaiveDate,
    pub employment_type: EmploymentType,
    pub marital_status: Option<MaritalStatus>,
    pub salary: Option<f64>,
    pub address: Option<String>,
}

impl EmployeeDraft {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Insert command for the employee store: a draft plus the identity the
/// ingestor derived for it. The code is immutable once persisted.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub id: Uuid,
    pub tenant: TenantId,
    pub code: String,
    pub draft: EmployeeDraft,
}

/// Persisted employee aggregate. Unique per tenant by business email and by
/// code; codes are never reused even if the employee is later removed.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: Uuid,
    pub tenant: TenantId,
    pub code: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub department: String,
    pub job_title: String,
    pub hire_date: NaiveDate,
    pub employment_type: EmploymentType,
    pub marital_status: Option<MaritalStatus>,
    pub salary: Option<f64>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
