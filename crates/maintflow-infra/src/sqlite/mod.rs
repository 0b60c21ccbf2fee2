//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Ids and timestamps are stored as text
//! (hyphenated UUIDs, RFC 3339 instants); enums use their wire names.

pub mod company;
pub mod maintenance;
pub mod pool;
pub mod webhook_config;
pub mod workflow;

use chrono::{DateTime, SecondsFormat, Utc};
use maintflow_types::error::RepositoryError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn parse_opt_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    s.map(parse_datetime).transpose()
}

/// Fixed-width UTC form, so text order is chronological order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid uuid '{s}': {e}")))
}

fn parse_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>, RepositoryError> {
    s.map(parse_uuid).transpose()
}

/// Wire name of a unit enum, e.g. `"EMERGENCY_SHUTDOWN"`.
fn enum_text<T: Serialize>(value: &T) -> Result<String, RepositoryError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Err(RepositoryError::Query(format!(
            "expected enum to serialize as text, got {other}"
        ))),
        Err(e) => Err(RepositoryError::Query(e.to_string())),
    }
}

fn opt_enum_text<T: Serialize>(value: Option<&T>) -> Result<Option<String>, RepositoryError> {
    value.map(enum_text).transpose()
}

fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, RepositoryError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| RepositoryError::Query(format!("invalid enum value '{s}': {e}")))
}

fn parse_opt_enum<T: DeserializeOwned>(s: Option<&str>) -> Result<Option<T>, RepositoryError> {
    s.map(parse_enum).transpose()
}

/// Map a write failure, turning UNIQUE violations into `Conflict`.
fn write_error(e: sqlx::Error, conflict: &str) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(conflict.to_string())
        }
        _ => RepositoryError::Query(e.to_string()),
    }
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> (tempfile::TempDir, pool::DatabasePool) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = pool::DatabasePool::new(&url).await.unwrap();
    (dir, pool)
}
