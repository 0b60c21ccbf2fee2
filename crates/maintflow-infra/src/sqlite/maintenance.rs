//! SQLite store for the maintenance objects workflows act on.
//!
//! Saves are upserts keyed by id. Work orders and requests share a column
//! layout, so both map through [`TicketRow`].

use maintflow_core::repository::maintenance::MaintenanceRepository;
use maintflow_types::error::RepositoryError;
use maintflow_types::maintenance::{Asset, Priority, PurchaseOrder, Request, Status, WorkOrder};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{
    enum_text, format_datetime, parse_datetime, parse_enum, parse_opt_datetime, parse_opt_uuid,
    parse_uuid, query_error,
};

const TICKET_COLUMNS: &str = "id, company_id, title, description, priority, status, asset_id, location_id, primary_user_id, team_id, category_id, due_date, created_at";

#[derive(Clone)]
pub struct SqliteMaintenanceRepository {
    pool: DatabasePool,
}

impl SqliteMaintenanceRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Common columns of `work_orders` and `requests`.
struct TicketRow {
    id: String,
    company_id: String,
    title: String,
    description: Option<String>,
    priority: String,
    status: String,
    asset_id: Option<String>,
    location_id: Option<String>,
    primary_user_id: Option<String>,
    team_id: Option<String>,
    category_id: Option<String>,
    due_date: Option<String>,
    created_at: String,
}

impl TicketRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            company_id: row.try_get("company_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            priority: row.try_get("priority")?,
            status: row.try_get("status")?,
            asset_id: row.try_get("asset_id")?,
            location_id: row.try_get("location_id")?,
            primary_user_id: row.try_get("primary_user_id")?,
            team_id: row.try_get("team_id")?,
            category_id: row.try_get("category_id")?,
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_request(self) -> Result<Request, RepositoryError> {
        let priority: Priority = self
            .priority
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let status: Status = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Request {
            id: parse_uuid(&self.id)?,
            company_id: parse_uuid(&self.company_id)?,
            title: self.title,
            description: self.description,
            priority,
            status,
            asset_id: parse_opt_uuid(self.asset_id.as_deref())?,
            location_id: parse_opt_uuid(self.location_id.as_deref())?,
            primary_user_id: parse_opt_uuid(self.primary_user_id.as_deref())?,
            team_id: parse_opt_uuid(self.team_id.as_deref())?,
            category_id: parse_opt_uuid(self.category_id.as_deref())?,
            due_date: parse_opt_datetime(self.due_date.as_deref())?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }

    fn into_work_order(self, custom_id: Option<String>) -> Result<WorkOrder, RepositoryError> {
        let r = self.into_request()?;
        Ok(WorkOrder {
            id: r.id,
            company_id: r.company_id,
            custom_id,
            title: r.title,
            description: r.description,
            priority: r.priority,
            status: r.status,
            asset_id: r.asset_id,
            location_id: r.location_id,
            primary_user_id: r.primary_user_id,
            team_id: r.team_id,
            category_id: r.category_id,
            due_date: r.due_date,
            created_at: r.created_at,
        })
    }
}

fn work_order_from_row(row: &SqliteRow) -> Result<WorkOrder, RepositoryError> {
    let custom_id: Option<String> = row.try_get("custom_id").map_err(query_error)?;
    TicketRow::from_row(row)
        .map_err(query_error)?
        .into_work_order(custom_id)
}

fn asset_from_row(row: &SqliteRow) -> Result<Asset, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let company_id: String = row.try_get("company_id").map_err(query_error)?;
    let status: String = row.try_get("status").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    Ok(Asset {
        id: parse_uuid(&id)?,
        company_id: parse_uuid(&company_id)?,
        name: row.try_get("name").map_err(query_error)?,
        status: parse_enum(&status)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn opt_text(id: Option<Uuid>) -> Option<String> {
    id.map(|u| u.to_string())
}

impl MaintenanceRepository for SqliteMaintenanceRepository {
    async fn save_work_order(&self, wo: &WorkOrder) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO work_orders (id, company_id, custom_id, title, description, priority, status, asset_id, location_id, primary_user_id, team_id, category_id, due_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                custom_id = excluded.custom_id, title = excluded.title, description = excluded.description,
                priority = excluded.priority, status = excluded.status, asset_id = excluded.asset_id,
                location_id = excluded.location_id, primary_user_id = excluded.primary_user_id,
                team_id = excluded.team_id, category_id = excluded.category_id, due_date = excluded.due_date",
        )
        .bind(wo.id.to_string())
        .bind(wo.company_id.to_string())
        .bind(&wo.custom_id)
        .bind(&wo.title)
        .bind(&wo.description)
        .bind(wo.priority.to_string())
        .bind(wo.status.to_string())
        .bind(opt_text(wo.asset_id))
        .bind(opt_text(wo.location_id))
        .bind(opt_text(wo.primary_user_id))
        .bind(opt_text(wo.team_id))
        .bind(opt_text(wo.category_id))
        .bind(wo.due_date.as_ref().map(format_datetime))
        .bind(format_datetime(&wo.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn save_request(&self, r: &Request) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO requests (id, company_id, title, description, priority, status, asset_id, location_id, primary_user_id, team_id, category_id, due_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title, description = excluded.description,
                priority = excluded.priority, status = excluded.status, asset_id = excluded.asset_id,
                location_id = excluded.location_id, primary_user_id = excluded.primary_user_id,
                team_id = excluded.team_id, category_id = excluded.category_id, due_date = excluded.due_date",
        )
        .bind(r.id.to_string())
        .bind(r.company_id.to_string())
        .bind(&r.title)
        .bind(&r.description)
        .bind(r.priority.to_string())
        .bind(r.status.to_string())
        .bind(opt_text(r.asset_id))
        .bind(opt_text(r.location_id))
        .bind(opt_text(r.primary_user_id))
        .bind(opt_text(r.team_id))
        .bind(opt_text(r.category_id))
        .bind(r.due_date.as_ref().map(format_datetime))
        .bind(format_datetime(&r.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn save_purchase_order(&self, po: &PurchaseOrder) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO purchase_orders (id, company_id, name, status, vendor_id, category_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name, status = excluded.status,
                vendor_id = excluded.vendor_id, category_id = excluded.category_id",
        )
        .bind(po.id.to_string())
        .bind(po.company_id.to_string())
        .bind(&po.name)
        .bind(enum_text(&po.status)?)
        .bind(opt_text(po.vendor_id))
        .bind(opt_text(po.category_id))
        .bind(format_datetime(&po.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn save_asset(&self, asset: &Asset) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO assets (id, company_id, name, status, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, status = excluded.status",
        )
        .bind(asset.id.to_string())
        .bind(asset.company_id.to_string())
        .bind(&asset.name)
        .bind(enum_text(&asset.status)?)
        .bind(format_datetime(&asset.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn find_asset(&self, id: &Uuid) -> Result<Option<Asset>, RepositoryError> {
        let row = sqlx::query("SELECT id, company_id, name, status, created_at FROM assets WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(asset_from_row).transpose()
    }

    async fn get_work_order(&self, id: &Uuid) -> Result<Option<WorkOrder>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT custom_id, {TICKET_COLUMNS} FROM work_orders WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.as_ref().map(work_order_from_row).transpose()
    }

    async fn list_work_orders(&self, company_id: &Uuid) -> Result<Vec<WorkOrder>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT custom_id, {TICKET_COLUMNS} FROM work_orders WHERE company_id = ? ORDER BY created_at ASC, id ASC"
        ))
        .bind(company_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(work_order_from_row).collect()
    }

    async fn list_requests(&self, company_id: &Uuid) -> Result<Vec<Request>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM requests WHERE company_id = ? ORDER BY created_at ASC, id ASC"
        ))
        .bind(company_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                TicketRow::from_row(row)
                    .map_err(query_error)
                    .and_then(TicketRow::into_request)
            })
            .collect()
    }

    async fn next_work_order_number(&self, company_id: &Uuid) -> Result<String, RepositoryError> {
        let next: i64 = sqlx::query_scalar(
            "INSERT INTO work_order_counters (company_id, last_value) VALUES (?, 1)
             ON CONFLICT(company_id) DO UPDATE SET last_value = last_value + 1
             RETURNING last_value",
        )
        .bind(company_id.to_string())
        .fetch_one(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(format!("WO{next:06}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;
    use chrono::Utc;
    use maintflow_types::maintenance::{ApprovalStatus, AssetStatus};

    #[tokio::test]
    async fn test_work_order_upsert() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteMaintenanceRepository::new(pool);
        let mut wo = WorkOrder::new(Uuid::now_v7(), "Replace belt");
        wo.custom_id = Some("WO000001".to_string());
        repo.save_work_order(&wo).await.unwrap();

        wo.priority = Priority::High;
        wo.team_id = Some(Uuid::now_v7());
        repo.save_work_order(&wo).await.unwrap();

        let stored = repo.get_work_order(&wo.id).await.unwrap().unwrap();
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.team_id, wo.team_id);
        assert_eq!(stored.custom_id.as_deref(), Some("WO000001"));
        assert_eq!(repo.list_work_orders(&wo.company_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_requests_listed_per_company() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteMaintenanceRepository::new(pool);
        let company = Uuid::now_v7();
        let mut first = Request::new(company, "Leak");
        first.status = Status::InProgress;
        repo.save_request(&first).await.unwrap();
        repo.save_request(&Request::new(company, "Noise")).await.unwrap();
        repo.save_request(&Request::new(Uuid::now_v7(), "Other")).await.unwrap();

        let listed = repo.list_requests(&company).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "Leak");
        assert_eq!(listed[0].status, Status::InProgress);
    }

    #[tokio::test]
    async fn test_asset_and_purchase_order_status_stored_by_wire_name() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteMaintenanceRepository::new(pool.clone());
        let mut asset = Asset {
            id: Uuid::now_v7(),
            company_id: Uuid::now_v7(),
            name: "Pump".to_string(),
            status: AssetStatus::Operational,
            created_at: Utc::now(),
        };
        repo.save_asset(&asset).await.unwrap();
        asset.status = AssetStatus::EmergencyShutdown;
        repo.save_asset(&asset).await.unwrap();
        assert_eq!(
            repo.find_asset(&asset.id).await.unwrap().unwrap().status,
            AssetStatus::EmergencyShutdown
        );

        let po = PurchaseOrder {
            id: Uuid::now_v7(),
            company_id: asset.company_id,
            name: "Bearings".to_string(),
            status: ApprovalStatus::Approved,
            vendor_id: None,
            category_id: None,
            created_at: Utc::now(),
        };
        repo.save_purchase_order(&po).await.unwrap();
        let (status,): (String,) = sqlx::query_as("SELECT status FROM purchase_orders WHERE id = ?")
            .bind(po.id.to_string())
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(status, "APPROVED");
    }

    #[tokio::test]
    async fn test_work_order_numbers_are_sequential_per_company() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteMaintenanceRepository::new(pool);
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();

        assert_eq!(repo.next_work_order_number(&a).await.unwrap(), "WO000001");
        assert_eq!(repo.next_work_order_number(&a).await.unwrap(), "WO000002");
        assert_eq!(repo.next_work_order_number(&b).await.unwrap(), "WO000001");
    }
}
