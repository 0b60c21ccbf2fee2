//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (maintflow-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod company;
pub mod maintenance;
pub mod webhook_config;
pub mod workflow;
