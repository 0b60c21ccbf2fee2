//! HTTP/REST API layer for maintflow.
//!
//! The webhook trigger lives at `/webhooks/grafana` and answers with the
//! `{success, message, timestamp}` body. Administrative endpoints live under
//! `/api/v1/` and use the envelope response format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
