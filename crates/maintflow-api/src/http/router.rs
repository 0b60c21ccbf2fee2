//! Axum router configuration with middleware.
//!
//! - `POST /webhooks/grafana`: the alert trigger, authenticated by `X-API-Key`.
//! - `/api/v1/...`: company, webhook-config and workflow administration.
//! - `GET /health`.
//!
//! Middleware: CORS, HTTP tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/companies", post(handlers::company::create_company))
        .route("/companies/{company_id}", get(handlers::company::get_company))
        .route(
            "/companies/{company_id}/admins",
            post(handlers::company::add_admin),
        )
        // Webhook configuration
        .route(
            "/companies/{company_id}/webhook-config",
            get(handlers::webhook_config::get_config)
                .post(handlers::webhook_config::create_config)
                .delete(handlers::webhook_config::delete_config),
        )
        .route(
            "/companies/{company_id}/webhook-config/regenerate",
            post(handlers::webhook_config::regenerate_key),
        )
        .route(
            "/companies/{company_id}/webhook-config/enabled/{enabled}",
            post(handlers::webhook_config::set_enabled),
        )
        // Workflows
        .route(
            "/companies/{company_id}/workflows",
            get(handlers::workflow::list_workflows).post(handlers::workflow::create_workflow),
        )
        .route(
            "/companies/{company_id}/workflows/disable",
            post(handlers::workflow::disable_workflows),
        )
        .route(
            "/companies/{company_id}/workflows/enable",
            post(handlers::workflow::enable_workflows),
        )
        .route(
            "/companies/{company_id}/workflows/{id}",
            get(handlers::workflow::get_workflow).delete(handlers::workflow::delete_workflow),
        )
        .route(
            "/companies/{company_id}/workflows/{id}/enabled/{enabled}",
            post(handlers::workflow::set_enabled),
        )
        // Workflow output
        .route(
            "/companies/{company_id}/work-orders",
            get(handlers::maintenance::list_work_orders),
        )
        .route(
            "/companies/{company_id}/requests",
            get(handlers::maintenance::list_requests),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/webhooks/grafana", post(handlers::webhook::receive_grafana))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - no auth required.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
