use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DepartmentDirectory, EmployeeRepository};
use crate::domain::{DomainError, Employee, NewEmployee, TenantId};

#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    employees_by_id: RwLock<HashMap<Uuid, Employee>>,
    id_by_email: RwLock<HashMap<(TenantId, String), Uuid>>,
    codes: RwLock<HashSet<(TenantId, String)>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, tenant: &TenantId) -> usize {
        self.employees_by_id
            .read()
            .await
            .values()
            .filter(|employee| &employee.tenant == tenant)
            .count()
    }

    pub async fn find_by_code(&self, tenant: &TenantId, code: &str) -> Option<Employee> {
        self.employees_by_id
            .read()
            .await
            .values()
            .find(|employee| &employee.tenant == tenant && employee.code == code)
            .cloned()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, DomainError> {
        let NewEmployee {
            id,
            tenant,
            code,
            draft,
        } = employee;
        let email_key = (tenant.clone(), draft.email.to_lowercase());

        let mut id_by_email = self.id_by_email.write().await;
        if id_by_email.contains_key(&email_key) {
            return Err(DomainError::conflict(format!(
                "email '{}' already belongs to an employee",
                draft.email
            )));
        }

        let mut codes = self.codes.write().await;
        if !codes.insert((tenant.clone(), code.clone())) {
            return Err(DomainError::conflict(format!(
                "employee code '{code}' is already assigned"
            )));
        }

        let created = Employee {
            id,
            tenant,
            code,
            first_name: draft.first_name,
            middle_name: draft.middle_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            date_of_birth: draft.date_of_birth,
            gender: draft.gender,
            department: draft.department,
            job_title: draft.job_title,
            hire_date: draft.hire_date,
            employment_type: draft.employment_type,
            marital_status: draft.marital_status,
            salary: draft.salary,
            address: draft.address,
            created_at: Utc::now(),
        };

        id_by_email.insert(email_key, created.id);
        self.employees_by_id
            .write()
            .await
            .insert(created.id, created.clone());

        Ok(created)
    }

    async fn emails_in_use(
        &self,
        tenant: &TenantId,
        emails: &[String],
    ) -> Result<HashSet<String>, DomainError> {
        let id_by_email = self.id_by_email.read().await;

        Ok(emails
            .iter()
            .map(|email| email.to_lowercase())
            .filter(|email| id_by_email.contains_key(&(tenant.clone(), email.clone())))
            .collect())
    }
}

/// Department reference data, seeded from configuration. Tenants without an
/// explicit department list share the configured defaults.
pub struct InMemoryDepartmentDirectory {
    defaults: Vec<String>,
    overrides: RwLock<HashMap<TenantId, Vec<String>>>,
}

impl InMemoryDepartmentDirectory {
    pub fn new(defaults: Vec<String>) -> Self {
        Self {
            defaults,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    pub async fn set_departments(&self, tenant: TenantId, names: Vec<String>) {
        self.overrides.write().await.insert(tenant, names);
    }
}

#[async_trait]
impl DepartmentDirectory for InMemoryDepartmentDirectory {
    async fn department_names(&self, tenant: &TenantId) -> Result<Vec<String>, DomainError> {
        let overrides = self.overrides.read().await;
        Ok(overrides
            .get(tenant)
            .cloned()
            .unwrap_or_else(|| self.defaults.clone()))
    }
}
