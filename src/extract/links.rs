//! Link extraction
//!
//! Links are split three ways:
//! - internal: same host as the page (relative links always resolve here)
//! - external: any other host
//! - anchors: fragment-only links, stored without the leading `#`
//!
//! `javascript:`, `mailto:`, `tel:` and `data:` links are dropped.

use crate::extract::selector;
use crate::url::{extract_domain, resolve_link, ResolvedHref};
use scraper::Html;
use serde::Serialize;
use url::Url;

/// Links found on a page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub internal: Vec<String>,
    pub external: Vec<String>,
    pub anchors: Vec<String>,
}

/// Extracts and classifies all `<a href>` links
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use url::Url;
/// use webglean::extract::extract_links;
///
/// let html = Html::parse_document(r##"<a href="/about">About</a><a href="#top">Top</a>"##);
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(&html, &base);
/// assert_eq!(links.internal, vec!["https://example.com/about"]);
/// assert_eq!(links.anchors, vec!["top"]);
/// ```
pub fn extract_links(document: &Html, base_url: &Url) -> PageLinks {
    let mut links = PageLinks::default();

    let Some(a_selector) = selector("a[href]") else {
        return links;
    };

    let base_domain = extract_domain(base_url);

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match resolve_link(href, base_url) {
            Some(ResolvedHref::Anchor(fragment)) => links.anchors.push(fragment),
            Some(ResolvedHref::Absolute(url)) => {
                if extract_domain(&url) == base_domain {
                    links.internal.push(url.to_string());
                } else {
                    links.external.push(url.to_string());
                }
            }
            None => {}
        }
    }

    links
}
