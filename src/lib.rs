// src/lib.rs
pub mod aggregator;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod geoip;
pub mod limiter;
pub mod phone;
pub mod prober;
pub mod server;
pub mod service;
pub mod session;
pub mod types;
pub mod validate;

pub use cli::Args;
pub use limiter::RateLimiter;
pub use service::LookupService;
pub use types::{Config, ProbeOutcome, ProbeReport, ProbeStatus, TrackerError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
