//! Scrape orchestration
//!
//! [`Scraper`] ties the pieces together: every page goes through the rate
//! limiter, then the fetcher, then the extractors, and successful results
//! are kept in the TTL cache keyed by URL and selector set.

mod report;

pub use report::{ScrapeOptions, ScrapeReport, ScrapeStatus, ScraperStats};

use crate::cache::{selector_key, TtlCache};
use crate::config::Config;
use crate::extract::{extract_all, extract_by_selector};
use crate::fetch::{build_fetcher, FetchRequest, PageFetcher};
use crate::limiter::RateLimiter;
use crate::output::{self, OutputFormat};
use crate::url::{parse_target, screenshot_file_name};
use chrono::Utc;
use scraper::Html;
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

/// Fetches, extracts and caches pages
pub struct Scraper {
    config: Config,
    limiter: RateLimiter,
    cache: Option<TtlCache<ScrapeReport>>,
    fetcher: Box<dyn PageFetcher>,
    pages_scraped: u64,
    cache_hits: u64,
    failed: u64,
}

impl Scraper {
    /// Creates a scraper using the engine selected in `config.browser`
    pub fn new(config: Config) -> crate::Result<Self> {
        let fetcher = build_fetcher(&config.browser)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates a scraper around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Box<dyn PageFetcher>) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| TtlCache::with_ttl_hours(config.cache.ttl_hours));

        Self {
            limiter: RateLimiter::from_config(&config.scraper),
            cache,
            fetcher,
            config,
            pages_scraped: 0,
            cache_hits: 0,
            failed: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Fetches a page's HTML, pacing through the rate limiter
    ///
    /// The limiter's backoff rises on failure and recovers on success.
    pub async fn fetch(
        &mut self,
        url: &str,
        wait_for: Option<&str>,
        scroll: bool,
    ) -> crate::Result<String> {
        let request = FetchRequest::new(url)
            .wait_for(wait_for.map(str::to_string))
            .scroll(scroll);
        self.fetch_request(&request).await
    }

    async fn fetch_request(&mut self, request: &FetchRequest) -> crate::Result<String> {
        self.limiter.wait().await;

        match self.fetcher.fetch(request).await {
            Ok(html) => {
                self.limiter.on_success();
                info!(
                    "Fetched {} ({} bytes via {})",
                    request.url,
                    html.len(),
                    self.fetcher.name()
                );
                Ok(html)
            }
            Err(e) => {
                self.limiter.on_failure();
                error!("Failed to fetch {}: {}", request.url, e);
                Err(e)
            }
        }
    }

    /// Scrapes a single page
    ///
    /// A fresh cached report for the same URL and selector set is returned
    /// without touching the network, unless a screenshot is requested.
    /// With `use_cache` off the cache is neither read nor written. Failed
    /// scrapes are never cached.
    pub async fn scrape(&mut self, url: &str, options: &ScrapeOptions) -> crate::Result<ScrapeReport> {
        let target = parse_target(url)?;
        let sel_key = selector_key(options.selectors.as_ref());
        let screenshot = options
            .screenshot_dir
            .as_ref()
            .map(|dir| dir.join(screenshot_file_name(&target)));

        if options.use_cache && screenshot.is_none() {
            if let Some(cached) = self.cache.as_mut().and_then(|c| c.get(url, &sel_key)) {
                self.cache_hits += 1;
                return Ok(cached);
            }
        }

        let request = FetchRequest::new(url)
            .wait_for(options.wait_for.clone())
            .scroll(options.scroll)
            .screenshot(screenshot.clone());

        let html = match self.fetch_request(&request).await {
            Ok(html) => html,
            Err(e) => {
                self.failed += 1;
                return Err(e);
            }
        };

        let mut report = build_report(
            url,
            &target,
            &html,
            options,
            self.config.scraper.text_max_length,
        );
        report.screenshot = screenshot;
        self.pages_scraped += 1;

        if options.use_cache {
            if let Some(cache) = self.cache.as_mut() {
                cache.set(url, &sel_key, report.clone(), None);
            }
        }

        Ok(report)
    }

    /// Scrapes several pages in order
    ///
    /// Never fails as a whole: a page that can't be scraped yields a report
    /// with `ScrapeStatus::Error` and the error message.
    pub async fn scrape_many(&mut self, urls: &[String], options: &ScrapeOptions) -> Vec<ScrapeReport> {
        let total = urls.len();
        let mut reports = Vec::with_capacity(total);

        for (index, url) in urls.iter().enumerate() {
            info!("[{}/{}] Scraping {}", index + 1, total, url);

            match self.scrape(url, options).await {
                Ok(report) => reports.push(report),
                Err(e) => reports.push(ScrapeReport::failed(url, e.to_string())),
            }
        }

        reports
    }

    /// Writes any serializable data to `path`
    pub fn export<T: Serialize + ?Sized>(
        &self,
        data: &T,
        path: &Path,
        format: OutputFormat,
    ) -> crate::Result<()> {
        output::export(data, path, format)?;
        Ok(())
    }

    pub fn stats(&self) -> ScraperStats {
        ScraperStats {
            engine: self.fetcher.name().to_string(),
            browser_running: self.fetcher.is_running(),
            pages_scraped: self.pages_scraped,
            cache_hits: self.cache_hits,
            failed: self.failed,
            rate_limiter: self.limiter.stats(),
            cache: self.cache.as_ref().map(TtlCache::stats),
        }
    }

    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }

    /// Shuts down the fetcher (closing the browser, if one was started)
    pub async fn close(&mut self) {
        self.fetcher.close().await;
    }
}

/// Runs the extractors over fetched HTML
///
/// Kept synchronous so the parsed document never lives across an await.
fn build_report(
    url: &str,
    target: &::url::Url,
    html: &str,
    options: &ScrapeOptions,
    text_max_length: usize,
) -> ScrapeReport {
    let document = Html::parse_document(html);

    let data = options
        .extract_all
        .then(|| extract_all(&document, target, text_max_length));

    let custom = options
        .selectors
        .as_ref()
        .filter(|selectors| !selectors.is_empty())
        .map(|selectors| extract_by_selector(&document, selectors));

    ScrapeReport {
        url: url.to_string(),
        scraped_at: Utc::now(),
        status: ScrapeStatus::Success,
        data,
        custom,
        error: None,
        screenshot: None,
    }
}

/// Scrapes one page with the default configuration
pub async fn scrape_once(url: &str, options: &ScrapeOptions) -> crate::Result<ScrapeReport> {
    let mut scraper = Scraper::new(Config::default())?;
    let result = scraper.scrape(url, options).await;
    scraper.close().await;
    result
}

/// Scrapes several pages with the default configuration
pub async fn scrape_batch(urls: &[String], options: &ScrapeOptions) -> crate::Result<Vec<ScrapeReport>> {
    let mut scraper = Scraper::new(Config::default())?;
    let reports = scraper.scrape_many(urls, options).await;
    scraper.close().await;
    Ok(reports)
}
