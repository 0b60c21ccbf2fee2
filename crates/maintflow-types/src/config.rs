//! Global configuration types for maintflow.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! HTTP listener, the webhook rate limit, and engine timeouts.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the maintflow service.
///
/// Loaded from `~/.maintflow/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token bucket settings for the webhook endpoint.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Workflow engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Where the REST API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Per-key token bucket parameters.
///
/// The bucket holds `capacity` tokens and refills greedily at
/// `capacity` tokens per `window_secs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_capacity() -> u32 {
    15
}

fn default_window_secs() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            window_secs: default_window_secs(),
        }
    }
}

/// Workflow engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on a webhook-triggered dispatch (persistence included).
    #[serde(default = "default_dispatch_timeout_secs")]
    pub dispatch_timeout_secs: u64,
}

fn default_dispatch_timeout_secs() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_secs: default_dispatch_timeout_secs(),
        }
    }
}
