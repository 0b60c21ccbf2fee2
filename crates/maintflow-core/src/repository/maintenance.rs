//! Maintenance collaborator port.
//!
//! The engine never owns work orders, requests, purchase orders or assets;
//! it mutates them and hands them back to their owning store through this
//! trait.

use maintflow_types::error::RepositoryError;
use maintflow_types::maintenance::{Asset, PurchaseOrder, Request, WorkOrder};
use uuid::Uuid;

pub trait MaintenanceRepository: Send + Sync {
    /// Insert or update a work order.
    fn save_work_order(
        &self,
        work_order: &WorkOrder,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert or update a request.
    fn save_request(
        &self,
        request: &Request,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert or update a purchase order.
    fn save_purchase_order(
        &self,
        purchase_order: &PurchaseOrder,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert or update an asset.
    fn save_asset(
        &self,
        asset: &Asset,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn find_asset(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Asset>, RepositoryError>> + Send;

    fn get_work_order(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<WorkOrder>, RepositoryError>> + Send;

    /// Work orders of a company, oldest first.
    fn list_work_orders(
        &self,
        company_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<WorkOrder>, RepositoryError>> + Send;

    /// Requests of a company, oldest first.
    fn list_requests(
        &self,
        company_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Request>, RepositoryError>> + Send;

    /// Next human-facing work order number for a company ("WO000001", ...).
    fn next_work_order_number(
        &self,
        company_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<String, RepositoryError>> + Send;
}
