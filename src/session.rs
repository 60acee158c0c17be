// src/session.rs
use crate::error::{ErrorContext, Result};
use crate::types::{TrackerError, UpstreamConfig};
use reqwest::Client;
use std::time::Duration;

/// Browser user agents rotated across probe requests. Some platforms
/// reject obvious non-browser clients outright; rotation keeps the
/// heuristic presence signal usable a little longer.
const PROBE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Shared outbound HTTP state: a pooled reqwest client plus the
/// user-agent rotation used by the prober.
#[derive(Clone)]
pub struct Session {
    pub client: Client,
}

impl Session {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut client_builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .config_context(|| format!("Invalid proxy URL {:?}", proxy_url))?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder
            .build()
            .config_context(|| "Failed to build HTTP client".to_string())?;

        Ok(Session { client })
    }

    pub fn probe_user_agent(&self) -> &'static str {
        use rand::seq::SliceRandom;
        let mut rng = rand::thread_rng();
        PROBE_USER_AGENTS
            .choose(&mut rng)
            .copied()
            .unwrap_or(PROBE_USER_AGENTS[0])
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(TrackerError::from)
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;

        if !response.status().is_success() {
            return Err(TrackerError::Upstream(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .upstream_context(|| format!("Reading body from {}", url))
    }

    pub async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.get(url).await?;

        if !response.status().is_success() {
            return Err(TrackerError::Upstream(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TrackerError::ParseError(e.to_string()))
    }
}
