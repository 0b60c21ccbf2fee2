//! Infrastructure layer for maintflow.
//!
//! Implements the ports defined in `maintflow-core`: SQLite repositories,
//! the SMTP notifier, and config/data-directory loading.

pub mod config;
pub mod notify;
pub mod sqlite;
