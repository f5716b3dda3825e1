//! Page fetching
//!
//! A [`PageFetcher`] turns a URL into rendered HTML. Two engines exist:
//! - `browser`: drives headless Chrome over the DevTools protocol so
//!   JavaScript-built pages come back fully rendered
//! - `http`: a plain reqwest GET, for static pages and tests

mod browser;
mod http;

pub use browser::BrowserDriver;
pub use http::{build_http_client, HttpFetcher};

use crate::config::{BrowserConfig, EngineKind};
use async_trait::async_trait;
use std::path::PathBuf;

/// A single page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    /// CSS selector that must be present before the page counts as loaded
    pub wait_for: Option<String>,
    /// Scroll through the page to trigger lazy loading
    pub scroll: bool,
    /// Save a full-page PNG here once the page is loaded
    pub screenshot: Option<PathBuf>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn wait_for(mut self, selector: Option<String>) -> Self {
        self.wait_for = selector;
        self
    }

    pub fn scroll(mut self, scroll: bool) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn screenshot(mut self, path: Option<PathBuf>) -> Self {
        self.screenshot = path;
        self
    }
}

/// Something that can load a page and hand back its HTML
#[async_trait]
pub trait PageFetcher: Send {
    /// Loads `request.url` and returns the page source
    async fn fetch(&mut self, request: &FetchRequest) -> crate::Result<String>;

    /// Releases any resources (browser process, connections)
    async fn close(&mut self);

    /// Whether the underlying engine is currently live
    fn is_running(&self) -> bool;

    /// Short engine name for logs
    fn name(&self) -> &'static str;
}

/// Builds the fetcher selected by `config.engine`
pub fn build_fetcher(config: &BrowserConfig) -> crate::Result<Box<dyn PageFetcher>> {
    match config.engine {
        EngineKind::Chrome => Ok(Box::new(BrowserDriver::new(config.clone()))),
        EngineKind::Http => Ok(Box::new(HttpFetcher::new(config)?)),
    }
}
