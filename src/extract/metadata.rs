use crate::extract::{element_text, meta_content, select_first};
use crate::url::{netloc, resolve_link, ResolvedHref};
use scraper::Html;
use serde::Serialize;
use url::Url;

/// Page-level metadata gathered from `<title>`, `<meta>` and `<html>` attributes
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageMetadata {
    pub url: String,
    pub domain: String,
    pub title: String,
    pub description: String,
    pub og_image: Option<String>,
    pub og_type: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub keywords: Vec<String>,
    pub language: Option<String>,
    pub canonical: Option<String>,
}

/// Extracts metadata (title, description, Open Graph tags, etc.)
///
/// # Fallback order
///
/// | Field | Sources, first non-empty wins |
/// |-------|-------------------------------|
/// | title | `<title>`, `og:title`, `twitter:title` |
/// | description | `description`, `og:description`, `twitter:description` |
/// | published_date | `publish_date`, `article:published_time` (name or property) |
pub fn extract_metadata(document: &Html, url: &Url) -> PageMetadata {
    let title = select_first(document, "title")
        .map(|el| element_text(el, " "))
        .filter(|t| !t.is_empty())
        .or_else(|| meta_content(document, r#"meta[property="og:title"]"#))
        .or_else(|| meta_content(document, r#"meta[name="twitter:title"]"#))
        .unwrap_or_default();

    let description = meta_content(document, r#"meta[name="description"]"#)
        .or_else(|| meta_content(document, r#"meta[property="og:description"]"#))
        .or_else(|| meta_content(document, r#"meta[name="twitter:description"]"#))
        .unwrap_or_default();

    let published_date = meta_content(document, r#"meta[name="publish_date"]"#)
        .or_else(|| meta_content(document, r#"meta[name="article:published_time"]"#))
        .or_else(|| meta_content(document, r#"meta[property="article:published_time"]"#));

    let keywords = meta_content(document, r#"meta[name="keywords"]"#)
        .map(|content| {
            content
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let language = select_first(document, "html")
        .and_then(|el| el.value().attr("lang"))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    let canonical = select_first(document, r#"link[rel="canonical"][href]"#)
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| match resolve_link(href, url) {
            Some(ResolvedHref::Absolute(resolved)) => Some(resolved.to_string()),
            _ => None,
        });

    PageMetadata {
        url: url.to_string(),
        domain: netloc(url),
        title,
        description,
        og_image: meta_content(document, r#"meta[property="og:image"]"#),
        og_type: meta_content(document, r#"meta[property="og:type"]"#),
        author: meta_content(document, r#"meta[name="author"]"#),
        published_date,
        keywords,
        language,
        canonical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://news.example.com/story?id=7").unwrap()
    }

    #[test]
    fn test_full_metadata() {
        let html = Html::parse_document(
            r#"<html lang="de"><head>
                <title> Story Title </title>
                <meta name="description" content="A short story">
                <meta property="og:image" content="https://cdn.example.com/og.png">
                <meta property="og:type" content="article">
                <meta name="author" content="Jane Roe">
                <meta name="publish_date" content="2024-01-15">
                <meta name="keywords" content="rust, scraping, ,html">
                <link rel="canonical" href="/story">
            </head><body></body></html>"#,
        );
        let meta = extract_metadata(&html, &base_url());

        assert_eq!(meta.url, "https://news.example.com/story?id=7");
        assert_eq!(meta.domain, "news.example.com");
        assert_eq!(meta.title, "Story Title");
        assert_eq!(meta.description, "A short story");
        assert_eq!(meta.og_image.as_deref(), Some("https://cdn.example.com/og.png"));
        assert_eq!(meta.og_type.as_deref(), Some("article"));
        assert_eq!(meta.author.as_deref(), Some("Jane Roe"));
        assert_eq!(meta.published_date.as_deref(), Some("2024-01-15"));
        assert_eq!(meta.keywords, vec!["rust", "scraping", "html"]);
        assert_eq!(meta.language.as_deref(), Some("de"));
        assert_eq!(meta.canonical.as_deref(), Some("https://news.example.com/story"));
    }

    #[test]
    fn test_open_graph_fallbacks() {
        let html = Html::parse_document(
            r#"<head>
                <meta property="og:title" content="OG Title">
                <meta property="og:description" content="OG Description">
                <meta property="article:published_time" content="2024-02-01T10:00:00Z">
            </head>"#,
        );
        let meta = extract_metadata(&html, &base_url());

        assert_eq!(meta.title, "OG Title");
        assert_eq!(meta.description, "OG Description");
        assert_eq!(meta.published_date.as_deref(), Some("2024-02-01T10:00:00Z"));
    }

    #[test]
    fn test_twitter_fallbacks() {
        let html = Html::parse_document(
            r#"<head>
                <meta name="twitter:title" content="Tweet Title">
                <meta name="twitter:description" content="Tweet Description">
            </head>"#,
        );
        let meta = extract_metadata(&html, &base_url());

        assert_eq!(meta.title, "Tweet Title");
        assert_eq!(meta.description, "Tweet Description");
    }

    #[test]
    fn test_missing_everything() {
        let html = Html::parse_document("<p>No head at all</p>");
        let meta = extract_metadata(&html, &base_url());

        assert_eq!(meta.title, "");
        assert_eq!(meta.description, "");
        assert!(meta.og_image.is_none());
        assert!(meta.author.is_none());
        assert!(meta.keywords.is_empty());
        assert!(meta.language.is_none());
        assert!(meta.canonical.is_none());
    }
}
