pub mod employee;
pub mod errors;
pub mod import;

pub use employee::{
    EMPLOYEE_CODE_PREFIX, EMPLOYEE_ENTITY_CLASS, Employee, EmployeeDraft, EmploymentType, Gender,
    MaritalStatus, NewEmployee, TenantId, format_employee_code,
};
pub use errors::DomainError;
pub use import::{
    CreatedEmployee, ImportRow, RowError, RowErrorKind, UploadReport, ValidationSummary,
};
