use crate::extract::selector;
use scraper::Html;

/// Extracts JSON-LD structured data blocks
///
/// Blocks that are empty or fail to parse as JSON are skipped.
pub fn extract_json_ld(document: &Html) -> Vec<serde_json::Value> {
    let Some(sel) = selector(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    document
        .select(&sel)
        .filter_map(|script| {
            let body = script.text().collect::<String>();
            let body = body.trim();
            if body.is_empty() {
                return None;
            }

            match serde_json::from_str(body) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Skipping malformed JSON-LD block: {}", e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multiple_blocks() {
        let html = Html::parse_document(
            r#"<head>
                <script type="application/ld+json">
                    {"@context": "https://schema.org", "@type": "Movie", "name": "Heat"}
                </script>
                <script type="application/ld+json">[{"@type": "Person"}]</script>
            </head>"#,
        );
        let blocks = extract_json_ld(&html);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["name"], json!("Heat"));
        assert_eq!(blocks[1], json!([{"@type": "Person"}]));
    }

    #[test]
    fn test_malformed_and_empty_blocks_skipped() {
        let html = Html::parse_document(
            r#"<script type="application/ld+json">{not json</script>
               <script type="application/ld+json">   </script>
               <script type="application/ld+json">{"ok": true}</script>"#,
        );
        let blocks = extract_json_ld(&html);

        assert_eq!(blocks, vec![json!({"ok": true})]);
    }

    #[test]
    fn test_other_scripts_ignored() {
        let html = Html::parse_document(r#"<script>{"@type": "Thing"}</script>"#);
        assert!(extract_json_ld(&html).is_empty());
    }
}
