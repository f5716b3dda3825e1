use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Computes the cache key for a URL and selector key
///
/// The key is the hex-encoded SHA-256 hash of `"{url}:{selector_key}"`.
///
/// # Example
///
/// ```
/// use webglean::cache::cache_key;
///
/// let key = cache_key("https://example.com/", "");
/// assert_eq!(key.len(), 64);
/// assert_ne!(key, cache_key("https://example.com/", "title=h1"));
/// ```
pub fn cache_key(url: &str, selector_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(b":");
    hasher.update(selector_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Builds a stable textual form of a selector set
///
/// Returns an empty string when no selectors are given. Otherwise the
/// `name=selector` pairs are joined with `;` in name order, so two maps with
/// the same contents always produce the same key.
pub fn selector_key(selectors: Option<&BTreeMap<String, String>>) -> String {
    match selectors {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(name, css)| format!("{}={}", name, css))
            .collect::<Vec<_>>()
            .join(";"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_sha256_hex() {
        // sha256("https://example.com/:")
        let mut hasher = Sha256::new();
        hasher.update(b"https://example.com/:");
        let expected = hex::encode(hasher.finalize());

        assert_eq!(cache_key("https://example.com/", ""), expected);
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        assert_eq!(
            cache_key("https://example.com/a", "x=p"),
            cache_key("https://example.com/a", "x=p")
        );
    }

    #[test]
    fn test_selector_key_empty() {
        assert_eq!(selector_key(None), "");
        assert_eq!(selector_key(Some(&BTreeMap::new())), "");
    }

    #[test]
    fn test_selector_key_sorted() {
        let mut map = BTreeMap::new();
        map.insert("price".to_string(), ".price".to_string());
        map.insert("name".to_string(), "h2.name".to_string());

        assert_eq!(selector_key(Some(&map)), "name=h2.name;price=.price");
    }
}
