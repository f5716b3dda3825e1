use url::Url;

/// Outcome of resolving an `href` attribute against a page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedHref {
    /// Fragment-only link on the same page (without the leading `#`)
    Anchor(String),

    /// Absolute HTTP(S) URL
    Absolute(Url),
}

/// Resolves a link href relative to a base URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - hrefs that fail to resolve
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<ResolvedHref> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if let Some(fragment) = href.strip_prefix('#') {
        return Some(ResolvedHref::Anchor(fragment.to_string()));
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(ResolvedHref::Absolute(absolute_url))
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
