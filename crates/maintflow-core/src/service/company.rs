//! Tenant bootstrap: companies and their administrators.

use maintflow_types::company::{Company, RoleType, User};
use maintflow_types::error::{CompanyError, RepositoryError};
use uuid::Uuid;

use crate::repository::company::CompanyRepository;

pub struct CompanyService<K: CompanyRepository> {
    repo: K,
}

impl<K: CompanyRepository> CompanyService<K> {
    pub fn new(repo: K) -> Self {
        Self { repo }
    }

    /// Create a company, optionally with a first administrator who will
    /// receive webhook failure notifications.
    pub async fn create(
        &self,
        name: &str,
        admin_email: Option<&str>,
    ) -> Result<(Company, Option<User>), CompanyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CompanyError::Invalid("name cannot be empty".to_string()));
        }
        let company = self
            .repo
            .create(&Company::new(name))
            .await
            .map_err(|e| CompanyError::StorageError(e.to_string()))?;

        let admin = match admin_email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => Some(self.add_admin(&company.id, email).await?),
            None => None,
        };

        tracing::info!(company_id = %company.id, name = %company.name, "company created");
        Ok((company, admin))
    }

    pub async fn add_admin(&self, company_id: &Uuid, email: &str) -> Result<User, CompanyError> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(CompanyError::Invalid(format!("'{email}' is not an email address")));
        }
        if self.get(company_id).await?.is_none() {
            return Err(CompanyError::NotFound);
        }
        let user = User {
            id: Uuid::now_v7(),
            company_id: *company_id,
            email: email.to_string(),
            role: RoleType::Admin,
        };
        self.repo
            .create_user(&user)
            .await
            .map_err(|e| CompanyError::StorageError(e.to_string()))
    }

    pub async fn get(&self, company_id: &Uuid) -> Result<Option<Company>, CompanyError> {
        self.repo
            .find_by_id(company_id)
            .await
            .map_err(|e: RepositoryError| CompanyError::StorageError(e.to_string()))
    }
}
