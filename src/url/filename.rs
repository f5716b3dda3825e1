use sha2::{Digest, Sha256};
use url::Url;

/// Longest slug kept before the hash suffix
const MAX_SLUG_LEN: usize = 80;

/// Builds a filesystem-safe PNG file name for a page screenshot
///
/// The host and path become a readable slug; a short hash of the full URL
/// keeps pages that differ only in their query string apart.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webglean::url::screenshot_file_name;
///
/// let url = Url::parse("https://example.com/blog/post-1").unwrap();
/// let name = screenshot_file_name(&url);
/// assert!(name.starts_with("example.com_blog_post-1_"));
/// assert!(name.ends_with(".png"));
/// ```
pub fn screenshot_file_name(url: &Url) -> String {
    let raw = format!("{}{}", url.host_str().unwrap_or("page"), url.path());

    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug: String = slug.trim_matches('_').chars().take(MAX_SLUG_LEN).collect();

    let digest = hex::encode(Sha256::digest(url.as_str().as_bytes()));
    format!("{}_{}.png", slug, &digest[..8])
}
