//! HTTP request handlers.

pub mod company;
pub mod maintenance;
pub mod webhook;
pub mod webhook_config;
pub mod workflow;
