//! Workflow engine, webhook gateway and repository trait definitions for maintflow.
//!
//! This crate defines the "ports" (repository and notifier traits) that the
//! infrastructure layer implements, and the engine that runs on top of them.
//! It depends only on `maintflow-types` -- never on `maintflow-infra` or any
//! database/IO crate.

pub mod notify;
pub mod repository;
pub mod service;
pub mod webhook;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
