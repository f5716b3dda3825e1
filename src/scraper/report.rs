use crate::cache::CacheStats;
use crate::config::Config;
use crate::extract::{FieldValue, PageData};
use crate::limiter::RateLimiterStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Per-call scrape settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Named CSS selectors to extract in addition to (or instead of) the full set
    pub selectors: Option<BTreeMap<String, String>>,
    pub wait_for: Option<String>,
    pub scroll: bool,
    pub use_cache: bool,
    /// Run every extractor, not just the custom selectors
    pub extract_all: bool,
    /// Directory for full-page screenshots; pages are always fetched live when set
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            selectors: None,
            wait_for: None,
            scroll: false,
            use_cache: true,
            extract_all: true,
            screenshot_dir: None,
        }
    }
}

impl ScrapeOptions {
    /// Options seeded from the `[scraper]` and `[selectors]` config sections
    pub fn from_config(config: &Config) -> Self {
        Self {
            selectors: (!config.selectors.is_empty()).then(|| config.selectors.clone()),
            extract_all: config.scraper.extract_all,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Success,
    Error,
}

/// Result of scraping one URL
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub status: ScrapeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PageData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<BTreeMap<String, FieldValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

impl ScrapeReport {
    /// A report for a page that could not be scraped
    pub fn failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scraped_at: Utc::now(),
            status: ScrapeStatus::Error,
            data: None,
            custom: None,
            error: Some(message.into()),
            screenshot: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ScrapeStatus::Success
    }
}

/// Counters from a scraping session
#[derive(Debug, Clone, Serialize)]
pub struct ScraperStats {
    pub engine: String,
    pub browser_running: bool,
    pub pages_scraped: u64,
    pub cache_hits: u64,
    pub failed: u64,
    pub rate_limiter: RateLimiterStats,
    pub cache: Option<CacheStats>,
}
