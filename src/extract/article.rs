use crate::extract::{element_text, select_first};
use scraper::{ElementRef, Html};
use serde::Serialize;

const TITLE_SELECTORS: &[&str] = &["h1", "h2.title", "[data-testid='title']", "title"];
const BODY_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".content",
    ".post-content",
    "body",
];
const AUTHOR_SELECTORS: &[&str] = &[".author", "[rel='author']", "[data-author]"];
const DATE_SELECTORS: &[&str] = &["time", "[datetime]", ".publish-date", ".date"];

/// Words per minute used for the read time estimate
const READING_SPEED_WPM: usize = 200;

/// Article-like content located through common selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub body: String,
    pub author: Option<String>,
    pub publish_date: Option<String>,
    pub word_count: usize,
    pub estimated_read_time: String,
}

impl Default for Article {
    fn default() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            author: None,
            publish_date: None,
            word_count: 0,
            estimated_read_time: "N/A".to_string(),
        }
    }
}

/// Extracts article-like content
///
/// For each field the selectors are tried in order and the first element
/// found wins, even if its text is empty.
pub fn extract_article(document: &Html) -> Article {
    let mut article = Article::default();

    if let Some(el) = first_match(document, TITLE_SELECTORS) {
        article.title = element_text(el, " ");
    }

    if let Some(el) = first_match(document, BODY_SELECTORS) {
        article.body = element_text(el, "\n");
    }

    article.author = first_match(document, AUTHOR_SELECTORS)
        .map(|el| {
            let text = element_text(el, " ");
            if text.is_empty() {
                el.value().attr("data-author").unwrap_or_default().trim().to_string()
            } else {
                text
            }
        });

    // <time datetime="..."></time> carries the date only in its attribute
    article.publish_date = first_match(document, DATE_SELECTORS).map(|el| {
        let text = element_text(el, " ");
        if text.is_empty() {
            el.value().attr("datetime").unwrap_or_default().trim().to_string()
        } else {
            text
        }
    });

    if !article.body.is_empty() {
        article.word_count = article.body.split_whitespace().count();
        article.estimated_read_time = read_time(article.word_count);
    }

    article
}

fn first_match<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|css| select_first(document, css))
}

fn read_time(word_count: usize) -> String {
    let minutes = (word_count / READING_SPEED_WPM).max(1);
    format!("{} min read", minutes)
}
