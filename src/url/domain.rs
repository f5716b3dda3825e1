use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webglean::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the network location of a URL: host plus an explicit port, if any
///
/// Default ports are omitted, matching how the URL would be displayed.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webglean::url::netloc;
///
/// let url = Url::parse("http://127.0.0.1:8080/index.html").unwrap();
/// assert_eq!(netloc(&url), "127.0.0.1:8080");
///
/// let url = Url::parse("https://example.com:443/").unwrap();
/// assert_eq!(netloc(&url), "example.com");
/// ```
pub fn netloc(url: &Url) -> String {
    let host = extract_domain(url).unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_extract_ip_address() {
        let url = Url::parse("https://192.168.1.1/").unwrap();
        assert_eq!(extract_domain(&url), Some("192.168.1.1".to_string()));
    }

    #[test]
    fn test_netloc_without_port() {
        let url = Url::parse("https://Example.com/a?b=c").unwrap();
        assert_eq!(netloc(&url), "example.com");
    }

    #[test]
    fn test_netloc_with_port() {
        let url = Url::parse("http://localhost:3000/").unwrap();
        assert_eq!(netloc(&url), "localhost:3000");
    }
}
