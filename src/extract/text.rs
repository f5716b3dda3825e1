use scraper::{ElementRef, Html};

/// Elements whose content is never part of the visible text
const SKIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "iframe", "noscript"];

/// Extracts clean visible text from a document
///
/// Text inside script, style, navigation, footer and iframe elements is
/// dropped. Every remaining text node is trimmed, blank nodes are discarded,
/// and the rest are joined one per line. The result is truncated to
/// `max_length` characters.
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use webglean::extract::extract_text;
///
/// let html = Html::parse_document(
///     "<body><script>var x;</script><h1>Title</h1><p> Body text </p></body>",
/// );
/// assert_eq!(extract_text(&html, 100), "Title\nBody text");
/// ```
pub fn extract_text(document: &Html, max_length: usize) -> String {
    let mut lines = Vec::new();
    collect_visible_text(document.root_element(), &mut lines);

    let text = lines.join("\n");
    if text.chars().count() > max_length {
        text.chars().take(max_length).collect()
    } else {
        text
    }
}

fn collect_visible_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if SKIPPED_TAGS.contains(&child_element.value().name()) {
                continue;
            }
            collect_visible_text(child_element, lines);
        } else if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_boilerplate() {
        let html = Html::parse_document(
            r#"<html><head><style>p { color: red }</style></head><body>
                <nav>Menu</nav>
                <p>Kept</p>
                <iframe>frame</iframe>
                <footer>Copyright</footer>
                <noscript>Enable JS</noscript>
            </body></html>"#,
        );
        assert_eq!(extract_text(&html, 1000), "Kept");
    }

    #[test]
    fn test_includes_title() {
        let html = Html::parse_document("<title>Page</title><p>Body</p>");
        assert_eq!(extract_text(&html, 1000), "Page\nBody");
    }

    #[test]
    fn test_drops_blank_lines() {
        let html = Html::parse_document("<div>\n\n   <p>One</p>\n\n<p>Two</p>   </div>");
        assert_eq!(extract_text(&html, 1000), "One\nTwo");
    }

    #[test]
    fn test_truncates_by_characters() {
        let html = Html::parse_document("<p>héllo wörld</p>");
        assert_eq!(extract_text(&html, 5), "héllo");
    }

    #[test]
    fn test_empty_document() {
        let html = Html::parse_document("");
        assert_eq!(extract_text(&html, 1000), "");
    }
}
