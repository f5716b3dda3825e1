//! webglean: a rendered-page scraper
//!
//! This crate fetches pages through a headless browser (or plain HTTP), extracts
//! structured data from the resulting HTML, and caches and exports the results
//! while pacing requests with an adaptive rate limiter.

pub mod cache;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod limiter;
pub mod output;
pub mod scraper;
pub mod url;

use thiserror::Error;

/// Main error type for webglean operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Timed out waiting for selector '{selector}' on {url}")]
    SelectorTimeout { url: String, selector: String },

    #[error("Navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Browser support not compiled in; rebuild with --features browser or use the http engine")]
    BrowserUnavailable,

    #[error("The {engine} engine cannot take screenshots; use the chrome engine")]
    ScreenshotUnsupported { engine: &'static str },

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Export error: {0}")]
    Export(#[from] output::ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{name}': {message}")]
    InvalidSelector { name: String, message: String },
}

/// Result type alias for webglean operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::TtlCache;
pub use config::Config;
pub use fetch::{FetchRequest, PageFetcher};
pub use limiter::RateLimiter;
pub use output::OutputFormat;
pub use self::scraper::{ScrapeOptions, ScrapeReport, ScrapeStatus, Scraper};
