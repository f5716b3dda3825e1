use crate::config::ScraperConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Snapshot of rate limiter counters
#[derive(Debug, Clone, Serialize)]
pub struct RateLimiterStats {
    pub requests_made: u64,
    pub requests_per_minute: u32,
    pub failures: u64,
    pub current_backoff: f64,
    pub last_request: Option<DateTime<Utc>>,
}

/// Spaces requests at least `60s / requests_per_minute * backoff` apart
///
/// The backoff multiplier starts at 1.0. Each failure multiplies it by the
/// backoff factor (capped at `max_backoff`); each success divides it by the
/// recovery divisor (floored at 1.0).
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests_per_minute: u32,
    min_interval: Duration,
    backoff_factor: f64,
    max_backoff: f64,
    recovery_divisor: f64,

    /// Number of requests let through so far
    pub request_count: u64,

    /// Number of failures reported
    pub failures: u64,

    /// Current backoff multiplier
    pub current_backoff: f64,

    /// Monotonic timestamp of the last request
    pub last_request_time: Option<Instant>,

    /// Wall-clock timestamp of the last request (for reporting)
    pub last_request_at: Option<DateTime<Utc>>,
}

impl RateLimiter {
    /// Creates a limiter for the given rate with the default backoff settings
    pub fn new(requests_per_minute: u32) -> Self {
        Self::from_config(&ScraperConfig {
            requests_per_minute,
            ..ScraperConfig::default()
        })
    }

    /// Creates a limiter from the scraper configuration
    pub fn from_config(config: &ScraperConfig) -> Self {
        let rpm = config.requests_per_minute.max(1);

        Self {
            requests_per_minute: rpm,
            min_interval: Duration::from_secs(60) / rpm,
            backoff_factor: config.backoff_factor,
            max_backoff: config.max_backoff,
            recovery_divisor: config.recovery_divisor,
            request_count: 0,
            failures: 0,
            current_backoff: 1.0,
            last_request_time: None,
            last_request_at: None,
        }
    }

    /// Base spacing between requests before backoff is applied
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Spacing between requests with the current backoff applied
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn effective_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.min_interval.as_secs_f64() * self.current_backoff)
            .unwrap_or(Duration::MAX)
    }

    /// Calculates how long to wait before the next request may be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn delay_needed(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let interval = self.effective_interval();
        let elapsed = now.saturating_duration_since(last);

        if elapsed < interval {
            Some(interval - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was made
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
        self.last_request_at = Some(Utc::now());
    }

    /// Sleeps until the next request is allowed, then records it
    pub async fn wait(&mut self) {
        if let Some(delay) = self.delay_needed(Instant::now()) {
            tracing::debug!("Rate limiting: waiting {:.2}s", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }

        self.record_request(Instant::now());
    }

    /// Increases the backoff after a failed request
    pub fn on_failure(&mut self) {
        self.failures += 1;
        self.current_backoff = (self.current_backoff * self.backoff_factor).min(self.max_backoff);
        tracing::warn!(
            "Request failed, backoff now: {:.2}x",
            self.current_backoff
        );
    }

    /// Decreases the backoff after a successful request
    pub fn on_success(&mut self) {
        self.current_backoff = (self.current_backoff / self.recovery_divisor).max(1.0);
    }

    /// Returns a snapshot of the limiter counters
    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            requests_made: self.request_count,
            requests_per_minute: self.requests_per_minute,
            failures: self.failures,
            current_backoff: self.current_backoff,
            last_request: self.last_request_at,
        }
    }
}
