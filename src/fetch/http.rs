//! Plain HTTP fetcher
//!
//! Serves pages that don't need JavaScript to render. The wait-for selector
//! is checked once against the returned document; there is nothing to wait
//! on, so a missing match fails immediately.

use crate::config::BrowserConfig;
use crate::fetch::{FetchRequest, PageFetcher};
use crate::ScrapeError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Example
///
/// ```
/// use webglean::config::BrowserConfig;
/// use webglean::fetch::build_http_client;
///
/// let client = build_http_client(&BrowserConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.page_load_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with a single GET request
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &BrowserConfig) -> crate::Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&mut self, request: &FetchRequest) -> crate::Result<String> {
        let url = request.url.as_str();
        if request.screenshot.is_some() {
            return Err(ScrapeError::ScreenshotUnsupported { engine: self.name() });
        }

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        if let Some(css) = request.wait_for.as_deref() {
            ensure_selector_present(&body, url, css)?;
        }

        Ok(body)
    }

    async fn close(&mut self) {}

    fn is_running(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

fn ensure_selector_present(body: &str, url: &str, css: &str) -> crate::Result<()> {
    let selector = Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })?;

    let document = Html::parse_document(body);
    if document.select(&selector).next().is_some() {
        Ok(())
    } else {
        Err(ScrapeError::SelectorTimeout {
            url: url.to_string(),
            selector: css.to_string(),
        })
    }
}
