//! URL handling module for webglean
//!
//! This module provides target URL validation, domain extraction,
//! resolution of link hrefs against a page's base URL and screenshot
//! file naming.

mod domain;
mod filename;
mod resolve;

pub use domain::{extract_domain, netloc};
pub use filename::screenshot_file_name;
pub use resolve::{resolve_link, ResolvedHref};

use crate::ScrapeError;
use url::Url;

/// Parses a scrape target and checks that it is an HTTP(S) URL
///
/// # Arguments
///
/// * `target` - The URL string supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(ScrapeError)` - The string is not a URL, or uses another scheme
///
/// # Examples
///
/// ```
/// use webglean::url::parse_target;
///
/// assert!(parse_target("https://example.com/page").is_ok());
/// assert!(parse_target("ftp://example.com/file").is_err());
/// assert!(parse_target("not a url").is_err());
/// ```
pub fn parse_target(target: &str) -> Result<Url, ScrapeError> {
    let url = Url::parse(target.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScrapeError::Navigation {
            url: target.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}
