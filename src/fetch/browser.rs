//! Headless Chrome driver
//!
//! The browser process is started lazily on the first fetch and reused for
//! every page after that. Each fetch opens a fresh tab, renders the page,
//! reads back the DOM and closes the tab again.

use crate::config::BrowserConfig;
use crate::fetch::{FetchRequest, PageFetcher};
#[cfg(not(feature = "browser"))]
use crate::ScrapeError;
use async_trait::async_trait;

#[cfg(feature = "browser")]
pub use driver::BrowserDriver;

#[cfg(feature = "browser")]
mod driver {
    use super::*;
    use crate::ScrapeError;
    use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
    use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, NavigateParams};
    use chromiumoxide::page::ScreenshotParams;
    use chromiumoxide::{Browser, BrowserConfig as LaunchConfig, Page};
    use futures::StreamExt;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tokio::task::JoinHandle;
    use tokio::time::Instant;
    use tracing::{debug, info, warn};

    /// Flags passed to every launched browser
    const BASE_ARGS: &[&str] = &[
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
        "--disable-notifications",
    ];

    /// Well-known install locations, checked in order
    const CHROME_PATHS: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/opt/google/chrome/google-chrome",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];

    const SCROLL_SCRIPT: &str = "window.scrollBy(0, window.innerHeight)";

    /// Interval between checks for the wait-for selector
    const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

    const FAR_FUTURE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

    /// Drives a headless Chrome instance over the DevTools protocol
    pub struct BrowserDriver {
        config: BrowserConfig,
        browser: Option<Browser>,
        handler: Option<JoinHandle<()>>,
    }

    impl BrowserDriver {
        pub fn new(config: BrowserConfig) -> Self {
            Self {
                config,
                browser: None,
                handler: None,
            }
        }

        /// Launches or connects to the browser if it isn't running yet
        async fn ensure_browser(&mut self) -> crate::Result<()> {
            if self.browser.is_some() {
                return Ok(());
            }

            let (browser, mut handler) = match self.config.remote_url.clone() {
                Some(remote) => connect_remote(&remote).await?,
                None => self.launch().await?,
            };

            self.handler = Some(tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            }));
            self.browser = Some(browser);

            Ok(())
        }

        async fn launch(&self) -> crate::Result<(Browser, chromiumoxide::Handler)> {
            info!("Launching browser (headless={})", self.config.headless);

            let mut builder = LaunchConfig::builder()
                .window_size(self.config.window_width, self.config.window_height);

            if let Some(path) = find_chrome(self.config.chrome_executable.as_deref()) {
                builder = builder.chrome_executable(path);
            }

            if !self.config.headless {
                builder = builder.with_head();
            }

            for arg in launch_args(&self.config) {
                builder = builder.arg(arg);
            }

            let launch_config = builder
                .build()
                .map_err(|e| ScrapeError::Browser(format!("invalid launch config: {}", e)))?;

            Browser::launch(launch_config)
                .await
                .map_err(|e| ScrapeError::Browser(format!("failed to launch browser: {}", e)))
        }

        async fn render(&self, page: &Page, request: &FetchRequest) -> crate::Result<String> {
            let url = request.url.as_str();

            page.execute(SetUserAgentOverrideParams::new(
                self.config.user_agent.clone(),
            ))
            .await
            .map_err(browser_error)?;

            self.navigate(page, url).await?;

            if let Some(css) = request.wait_for.as_deref() {
                self.wait_for_selector(page, url, css).await?;
            }

            if request.scroll {
                self.scroll(page).await;
            }

            let html = page.content().await.map_err(browser_error)?;

            if let Some(path) = request.screenshot.as_deref() {
                self.screenshot(page, path).await?;
            }

            Ok(html)
        }

        /// Saves a full-page PNG of the current tab
        async fn screenshot(&self, page: &Page, path: &Path) -> crate::Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }

            let params = ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(true)
                .build();
            page.save_screenshot(params, path)
                .await
                .map_err(browser_error)?;

            info!("Screenshot saved to {}", path.display());
            Ok(())
        }

        async fn navigate(&self, page: &Page, url: &str) -> crate::Result<()> {
            info!("Navigating to {}", url);

            let params = NavigateParams::builder()
                .url(url)
                .build()
                .map_err(|message| ScrapeError::Navigation {
                    url: url.to_string(),
                    message,
                })?;

            let timeout = Duration::from_secs(self.config.page_load_timeout);
            tokio::time::timeout(timeout, page.goto(params))
                .await
                .map_err(|_| ScrapeError::Timeout {
                    url: url.to_string(),
                })?
                .map_err(|e| ScrapeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

            Ok(())
        }

        async fn wait_for_selector(&self, page: &Page, url: &str, css: &str) -> crate::Result<()> {
            debug!("Waiting for selector: {}", css);
            let deadline = selector_deadline(Instant::now(), self.config.wait_timeout);

            loop {
                if page.find_element(css).await.is_ok() {
                    debug!("Selector found: {}", css);
                    return Ok(());
                }

                if Instant::now() >= deadline {
                    warn!("Timeout waiting for selector {} on {}", css, url);
                    return Err(ScrapeError::SelectorTimeout {
                        url: url.to_string(),
                        selector: css.to_string(),
                    });
                }

                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        }

        async fn scroll(&self, page: &Page) {
            let pause = Duration::from_millis(self.config.scroll_pause_ms);

            for step in 0..self.config.scroll_steps {
                if let Err(e) = page.evaluate(SCROLL_SCRIPT.to_string()).await {
                    debug!("Scroll step {} failed: {}", step, e);
                    break;
                }
                tokio::time::sleep(pause).await;
            }
        }
    }

    #[async_trait]
    impl PageFetcher for BrowserDriver {
        async fn fetch(&mut self, request: &FetchRequest) -> crate::Result<String> {
            self.ensure_browser().await?;

            let browser = self
                .browser
                .as_ref()
                .ok_or_else(|| ScrapeError::Browser("browser not initialized".to_string()))?;
            let page = browser.new_page("about:blank").await.map_err(browser_error)?;

            // The tab is closed whether or not rendering succeeded
            let result = self.render(&page, request).await;
            if let Err(e) = page.close().await {
                debug!("Failed to close tab: {}", e);
            }
            result
        }

        async fn close(&mut self) {
            if let Some(mut browser) = self.browser.take() {
                info!("Closing browser");
                if let Err(e) = browser.close().await {
                    warn!("Failed to close browser cleanly: {}", e);
                }
                if let Err(e) = browser.wait().await {
                    debug!("Failed to wait for browser process: {}", e);
                }
            }
            if let Some(handler) = self.handler.take() {
                handler.abort();
            }
        }

        fn is_running(&self) -> bool {
            self.browser.is_some()
        }

        fn name(&self) -> &'static str {
            "chrome"
        }
    }

    /// Deadline for the wait-for selector, saturating at roughly a year out
    pub(super) fn selector_deadline(now: Instant, wait_timeout: u64) -> Instant {
        now.checked_add(Duration::from_secs(wait_timeout))
            .unwrap_or_else(|| now + FAR_FUTURE)
    }

    fn browser_error(e: chromiumoxide::error::CdpError) -> ScrapeError {
        ScrapeError::Browser(e.to_string())
    }

    /// Builds the extra command line flags for a launch
    pub(super) fn launch_args(config: &BrowserConfig) -> Vec<String> {
        BASE_ARGS
            .iter()
            .map(|arg| arg.to_string())
            .chain(config.chrome_args.iter().cloned())
            .collect()
    }

    /// Picks the configured executable, else the first known install path
    ///
    /// Returns None to let chromiumoxide run its own detection.
    fn find_chrome(configured: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = configured {
            return Some(PathBuf::from(path));
        }

        let found = CHROME_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists());
        if let Some(path) = &found {
            debug!("Found Chrome at {}", path.display());
        }
        found
    }

    /// Maps a DevTools base URL to its `/json/version` endpoint
    pub(super) fn devtools_version_url(remote: &str) -> String {
        let http_url = remote
            .replacen("ws://", "http://", 1)
            .replacen("wss://", "https://", 1);
        format!("{}/json/version", http_url.trim_end_matches('/'))
    }

    /// Pulls the browser WebSocket endpoint out of a `/json/version` response
    pub(super) fn websocket_debugger_url(body: &str) -> crate::Result<String> {
        let version: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ScrapeError::Browser(format!("invalid /json/version response: {}", e)))?;

        version
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ScrapeError::Browser("no webSocketDebuggerUrl in /json/version".to_string())
            })
    }

    async fn connect_remote(remote: &str) -> crate::Result<(Browser, chromiumoxide::Handler)> {
        info!("Connecting to remote browser at {}", remote);

        let body = reqwest::get(devtools_version_url(remote))
            .await?
            .text()
            .await?;
        let ws_url = websocket_debugger_url(&body)?;

        debug!("Connecting to WebSocket: {}", ws_url);
        Browser::connect(ws_url)
            .await
            .map_err(|e| ScrapeError::Browser(format!("failed to connect: {}", e)))
    }
}

/// Placeholder used when the crate is built without browser support
#[cfg(not(feature = "browser"))]
pub struct BrowserDriver {
    #[allow(dead_code)]
    config: BrowserConfig,
}

#[cfg(not(feature = "browser"))]
impl BrowserDriver {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl PageFetcher for BrowserDriver {
    async fn fetch(&mut self, _request: &FetchRequest) -> crate::Result<String> {
        Err(ScrapeError::BrowserUnavailable)
    }

    async fn close(&mut self) {}

    fn is_running(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "chrome"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScrapeError;

    #[tokio::test]
    async fn test_close_before_launch_is_noop() {
        let mut driver = BrowserDriver::new(BrowserConfig::default());
        assert!(!driver.is_running());

        driver.close().await;
        assert!(!driver.is_running());
    }

    #[cfg(feature = "browser")]
    #[test]
    fn test_launch_args_include_extras() {
        let config = BrowserConfig {
            chrome_args: vec!["--lang=de".to_string()],
            ..Default::default()
        };
        let args = driver::launch_args(&config);

        assert_eq!(args.first().map(String::as_str), Some("--no-sandbox"));
        assert!(args.contains(&"--disable-notifications".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--lang=de"));
    }

    #[cfg(feature = "browser")]
    #[test]
    fn test_devtools_version_url() {
        assert_eq!(
            driver::devtools_version_url("ws://127.0.0.1:9222/"),
            "http://127.0.0.1:9222/json/version"
        );
        assert_eq!(
            driver::devtools_version_url("https://chrome.internal:9222"),
            "https://chrome.internal:9222/json/version"
        );
    }

    #[cfg(feature = "browser")]
    #[test]
    fn test_websocket_debugger_url() {
        let body = r#"{"Browser": "Chrome/120.0", "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/browser/abc"}"#;
        assert_eq!(
            driver::websocket_debugger_url(body).unwrap(),
            "ws://127.0.0.1:9222/devtools/browser/abc"
        );

        assert!(matches!(
            driver::websocket_debugger_url(r#"{"Browser": "Chrome/120.0"}"#),
            Err(ScrapeError::Browser(_))
        ));
        assert!(matches!(
            driver::websocket_debugger_url("<html>not json</html>"),
            Err(ScrapeError::Browser(_))
        ));
    }

    #[cfg(feature = "browser")]
    #[test]
    fn test_selector_deadline_saturates() {
        let now = tokio::time::Instant::now();
        assert_eq!(
            driver::selector_deadline(now, 10),
            now + std::time::Duration::from_secs(10)
        );
        assert!(driver::selector_deadline(now, u64::MAX) > now);
    }

    #[cfg(not(feature = "browser"))]
    #[tokio::test]
    async fn test_stub_reports_unavailable() {
        let mut driver = BrowserDriver::new(BrowserConfig::default());
        let err = driver
            .fetch(&FetchRequest::new("https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::BrowserUnavailable));
    }
}
