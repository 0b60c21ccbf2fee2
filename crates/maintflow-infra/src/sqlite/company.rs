//! SQLite company and user repository implementation.

use maintflow_core::repository::company::CompanyRepository;
use maintflow_types::company::{Company, RoleType, User};
use maintflow_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error, write_error};

#[derive(Clone)]
pub struct SqliteCompanyRepository {
    pool: DatabasePool,
}

impl SqliteCompanyRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let company_id: String = row.try_get("company_id").map_err(query_error)?;
    let email: String = row.try_get("email").map_err(query_error)?;
    let role: String = row.try_get("role").map_err(query_error)?;
    Ok(User {
        id: parse_uuid(&id)?,
        company_id: parse_uuid(&company_id)?,
        email,
        role: role
            .parse::<RoleType>()
            .map_err(|e: String| RepositoryError::Query(e))?,
    })
}

impl CompanyRepository for SqliteCompanyRepository {
    async fn create(&self, company: &Company) -> Result<Company, RepositoryError> {
        sqlx::query("INSERT INTO companies (id, name, created_at) VALUES (?, ?, ?)")
            .bind(company.id.to_string())
            .bind(&company.name)
            .bind(format_datetime(&company.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| write_error(e, &format!("company {} already exists", company.id)))?;

        Ok(company.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Company>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, created_at FROM companies WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: String = row.try_get("id").map_err(query_error)?;
        let created_at: String = row.try_get("created_at").map_err(query_error)?;
        Ok(Some(Company {
            id: parse_uuid(&id)?,
            name: row.try_get("name").map_err(query_error)?,
            created_at: parse_datetime(&created_at)?,
        }))
    }

    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        sqlx::query("INSERT INTO users (id, company_id, email, role) VALUES (?, ?, ?, ?)")
            .bind(user.id.to_string())
            .bind(user.company_id.to_string())
            .bind(&user.email)
            .bind(user.role.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| write_error(e, &format!("email {} already registered", user.email)))?;

        Ok(user.clone())
    }

    async fn find_admins(&self, company_id: &Uuid) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, company_id, email, role FROM users WHERE company_id = ? AND role = ? ORDER BY email",
        )
        .bind(company_id.to_string())
        .bind(RoleType::Admin.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(user_from_row).collect()
    }
}
