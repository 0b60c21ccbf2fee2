//! Webhook ingestion: rate limiting, payload normalization and the gateway
//! that ties them to the workflow engine.

pub mod gateway;
pub mod normalizer;
pub mod rate_limiter;
