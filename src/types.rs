// src/types.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub probe: ProbeConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
    /// How often the background sweeper drops clients whose window fully expired.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
            sweep_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-probe timeout. Each platform check owns its own deadline.
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub geoip_url: String,
    pub echo_ip_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub proxy: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geoip_url: "http://ipwho.is".to_string(),
            echo_ip_url: "https://api.ipify.org".to_string(),
            timeout_secs: 15,
            user_agent: format!("identitrace/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Found,
    NotFound,
    Error,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Found => write!(f, "found"),
            ProbeStatus::NotFound => write!(f, "not_found"),
            ProbeStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of one platform check for one username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub platform: String,
    pub url: String,
    pub status: ProbeStatus,
}

/// Aggregate result of one username query, partitioned in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub username: String,
    pub found_count: usize,
    pub total_searched: usize,
    pub found_profiles: Vec<ProbeOutcome>,
    pub not_found_profiles: Vec<ProbeOutcome>,
    pub success: bool,
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Too many requests, try again later")]
    RateLimited,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}
