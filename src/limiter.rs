// src/limiter.rs
use crate::types::RateLimitConfig;
use dashmap::DashMap;
use log::debug;
use std::time::{Duration, Instant};

/// Per-client sliding-window rate limiter.
///
/// Keeps an exact timestamp log per client rather than fixed-aligned
/// buckets, so the window moves continuously. Entries older than the
/// window are purged on every admission check, which bounds memory per
/// client; idle clients are dropped by [`RateLimiter::sweep`].
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    windows: DashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests as usize,
            window,
            windows: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            Duration::from_secs(config.window_secs),
        )
    }

    /// Admission check for one request from `client_id`.
    ///
    /// Purges expired timestamps, then admits and records the request
    /// unless the client already has `max_requests` timestamps inside
    /// the trailing window. Denials leave the stored window untouched
    /// beyond the purge. The dashmap entry guard serializes concurrent
    /// checks for the same client, so no update is lost.
    pub fn admit(&self, client_id: &str) -> bool {
        let now = Instant::now();
        let mut timestamps = self.windows.entry(client_id.to_string()).or_default();

        timestamps.retain(|&t| now.duration_since(t) < self.window);

        if timestamps.len() >= self.max_requests {
            debug!("Rate limit hit for client {}", client_id);
            return false;
        }

        timestamps.push(now);
        true
    }

    /// Drops clients whose newest timestamp has already expired.
    ///
    /// The per-client log is self-bounding, but the client key set is
    /// not; callers should run this periodically.
    pub fn sweep(&self) {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows
            .retain(|_, timestamps| timestamps.iter().any(|&t| now.duration_since(t) < self.window));
        let dropped = before.saturating_sub(self.windows.len());
        if dropped > 0 {
            debug!("Rate limiter sweep dropped {} idle clients", dropped);
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_limit() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        for i in 0..10 {
            assert!(limiter.admit("1.2.3.4"), "request {} should be admitted", i + 1);
        }
    }

    #[test]
    fn test_denies_over_limit() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        for _ in 0..10 {
            assert!(limiter.admit("1.2.3.4"));
        }
        assert!(!limiter.admit("1.2.3.4"));
        // Still denied; denials are not recorded
        assert!(!limiter.admit("1.2.3.4"));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.admit("1.1.1.1"));
        assert!(limiter.admit("1.1.1.1"));
        assert!(!limiter.admit("1.1.1.1"));

        assert!(limiter.admit("2.2.2.2"));
    }

    #[test]
    fn test_window_expiry_readmits() {
        let limiter = RateLimiter::new(2, Duration::from_millis(50));
        assert!(limiter.admit("1.2.3.4"));
        assert!(limiter.admit("1.2.3.4"));
        assert!(!limiter.admit("1.2.3.4"));

        std::thread::sleep(Duration::from_millis(80));
        assert!(limiter.admit("1.2.3.4"));
    }

    #[test]
    fn test_sweep_drops_idle_clients() {
        let limiter = RateLimiter::new(5, Duration::from_millis(30));
        assert!(limiter.admit("1.2.3.4"));
        assert!(limiter.admit("5.6.7.8"));
        assert_eq!(limiter.tracked_clients(), 2);

        std::thread::sleep(Duration::from_millis(60));
        limiter.sweep();
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_sweep_keeps_active_clients() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        assert!(limiter.admit("1.2.3.4"));
        limiter.sweep();
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
