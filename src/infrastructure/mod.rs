use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{DomainError, Employee, NewEmployee, TenantId};

pub mod in_memory;

pub use in_memory::{InMemoryDepartmentDirectory, InMemoryEmployeeRepository};

/// Persistence surface the import pipeline needs from the employee store.
/// The wider CRUD surface of the suite lives in another service; only these
/// two operations are consumed here.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserts one employee. Fails with [`DomainError::Conflict`] when the
    /// tenant already holds the business email or the code. Each insert is
    /// individually atomic; there is no batch transaction above it.
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, DomainError>;

    /// Returns which of `emails` (compared lowercased) are already taken
    /// within the tenant. One batched lookup per import call, regardless of
    /// file size.
    async fn emails_in_use(
        &self,
        tenant: &TenantId,
        emails: &[String],
    ) -> Result<HashSet<String>, DomainError>;
}

/// Read-only reference data owned by the department service.
#[async_trait]
pub trait DepartmentDirectory: Send + Sync {
    async fn department_names(&self, tenant: &TenantId) -> Result<Vec<String>, DomainError>;
}
