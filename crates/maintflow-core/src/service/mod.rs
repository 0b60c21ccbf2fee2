//! Administrative services.
//!
//! Thin orchestration over the repository ports, used by both the CLI and
//! the REST API. Each service is generic over its repositories.

pub mod company;
pub mod webhook_config;
pub mod workflow;
