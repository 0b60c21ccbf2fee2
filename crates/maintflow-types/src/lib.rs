//! Shared domain types for maintflow.
//!
//! Workflows, their conditions and actions, the maintenance objects they act
//! on, webhook configuration and the normalized alert value, plus the error
//! types shared across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod alert;
pub mod company;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod webhook;
pub mod workflow;
