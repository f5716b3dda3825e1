use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for webglean
///
/// Every section is optional; missing sections fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Named CSS selectors applied to every page (name -> selector)
    #[serde(default)]
    pub selectors: BTreeMap<String, String>,
}

/// Request pacing and extraction behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum request rate
    #[serde(rename = "requests-per-minute", default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Multiplier applied to the backoff after a failed fetch
    #[serde(rename = "backoff-factor", default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Upper bound for the backoff multiplier
    #[serde(rename = "max-backoff", default = "default_max_backoff")]
    pub max_backoff: f64,

    /// Divisor applied to the backoff after a successful fetch
    #[serde(rename = "recovery-divisor", default = "default_recovery_divisor")]
    pub recovery_divisor: f64,

    /// Run every extractor on each page (otherwise only custom selectors)
    #[serde(rename = "extract-all", default = "default_true")]
    pub extract_all: bool,

    /// Maximum number of characters kept from the visible page text
    #[serde(rename = "text-max-length", default = "default_text_max_length")]
    pub text_max_length: usize,
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Time-to-live for cached results (hours)
    #[serde(rename = "ttl-hours", default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

/// Which fetcher to use for page retrieval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Headless Chromium via the DevTools protocol
    #[default]
    Chrome,
    /// Plain HTTP GET without JavaScript rendering
    Http,
}

/// Browser / fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub engine: EngineKind,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// Page load timeout (seconds)
    #[serde(rename = "page-load-timeout", default = "default_page_load_timeout")]
    pub page_load_timeout: u64,

    /// How long to wait for a `wait_for` selector (seconds)
    #[serde(rename = "wait-timeout", default = "default_wait_timeout")]
    pub wait_timeout: u64,

    /// Number of viewport-height scrolls performed when scrolling is requested
    #[serde(rename = "scroll-steps", default = "default_scroll_steps")]
    pub scroll_steps: u32,

    /// Pause after each scroll step (milliseconds)
    #[serde(rename = "scroll-pause-ms", default = "default_scroll_pause_ms")]
    pub scroll_pause_ms: u64,

    #[serde(rename = "window-width", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "window-height", default = "default_window_height")]
    pub window_height: u32,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Explicit Chrome/Chromium binary; searched on common paths otherwise
    #[serde(rename = "chrome-executable", default)]
    pub chrome_executable: Option<String>,

    /// DevTools endpoint of an already running browser (e.g. "ws://localhost:9222")
    #[serde(rename = "remote-url", default)]
    pub remote_url: Option<String>,

    /// Additional command line arguments passed to Chrome
    #[serde(rename = "chrome-args", default)]
    pub chrome_args: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory used when no explicit output path is given
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Default export format ("json" or "csv")
    #[serde(default = "default_output_format")]
    pub format: String,
}

fn default_true() -> bool {
    true
}

fn default_requests_per_minute() -> u32 {
    30
}

fn default_backoff_factor() -> f64 {
    1.5
}

fn default_max_backoff() -> f64 {
    10.0
}

fn default_recovery_divisor() -> f64 {
    2.0
}

fn default_text_max_length() -> usize {
    10_000
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_page_load_timeout() -> u64 {
    30
}

fn default_wait_timeout() -> u64 {
    10
}

fn default_scroll_steps() -> u32 {
    5
}

fn default_scroll_pause_ms() -> u64 {
    1000
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_output_format() -> String {
    "json".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            backoff_factor: default_backoff_factor(),
            max_backoff: default_max_backoff(),
            recovery_divisor: default_recovery_divisor(),
            extract_all: true,
            text_max_length: default_text_max_length(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_hours: default_ttl_hours(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            headless: true,
            page_load_timeout: default_page_load_timeout(),
            wait_timeout: default_wait_timeout(),
            scroll_steps: default_scroll_steps(),
            scroll_pause_ms: default_scroll_pause_ms(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: default_user_agent(),
            chrome_executable: None,
            remote_url: None,
            chrome_args: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            format: default_output_format(),
        }
    }
}
