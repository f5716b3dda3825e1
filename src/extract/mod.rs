//! HTML data extraction
//!
//! Each submodule parses one facet of a document:
//! - `metadata`: title, description, Open Graph and other `<meta>` tags
//! - `text`: visible text with boilerplate elements removed
//! - `tables`: `<table>` elements as header + row grids
//! - `lists`: `<ul>` / `<ol>` items
//! - `json_ld`: embedded JSON-LD blocks
//! - `links`: internal, external and anchor links
//! - `article`: article-like content found through fallback selectors
//! - `custom`: caller-supplied CSS selectors
//!
//! All extractors are stateless and infallible: a document that lacks a
//! facet simply yields empty fields.

mod article;
mod custom;
mod json_ld;
mod links;
mod lists;
mod metadata;
mod tables;
mod text;

pub use article::{extract_article, Article};
pub use custom::{extract_by_selector, FieldValue};
pub use json_ld::extract_json_ld;
pub use links::{extract_links, PageLinks};
pub use lists::extract_lists;
pub use metadata::{extract_metadata, PageMetadata};
pub use tables::{extract_tables, Table};
pub use text::extract_text;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Everything the extractors found on a page
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub metadata: PageMetadata,
    pub text: String,
    pub tables: Vec<Table>,
    pub lists: BTreeMap<String, Vec<String>>,
    pub json_ld: Vec<serde_json::Value>,
    pub links: PageLinks,
    pub article: Article,
    pub extracted_at: DateTime<Utc>,
}

/// Runs every extractor over a parsed document
///
/// # Arguments
///
/// * `document` - The parsed HTML document
/// * `url` - The URL the document was fetched from
/// * `text_max_length` - Maximum number of characters of visible text to keep
pub fn extract_all(document: &Html, url: &Url, text_max_length: usize) -> PageData {
    PageData {
        metadata: extract_metadata(document, url),
        text: extract_text(document, text_max_length),
        tables: extract_tables(document),
        lists: extract_lists(document),
        json_ld: extract_json_ld(document),
        links: extract_links(document, url),
        article: extract_article(document),
        extracted_at: Utc::now(),
    }
}

/// Parses a selector that is known to be valid at compile time
///
/// Returns None rather than panicking so a typo degrades to an empty field.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Returns the first element matching `css`, if any
pub(crate) fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    document.select(&sel).next()
}

/// Concatenates the trimmed, non-empty text nodes below an element
pub(crate) fn element_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Returns the trimmed `content` attribute of the first matching `<meta>` tag
pub(crate) fn meta_content(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
