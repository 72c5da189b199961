use thiserror::Error;
use url::Url;

/// Reasons a configured feed URL cannot be polled.
#[derive(Error, Debug)]
pub enum FeedUrlError {
    /// The URL string could not be parsed (relative, empty host, ...).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Checks that `url_str` is an absolute http(s) URL.
///
/// The config parser only uses this to warn: the feed URL is stored as
/// written even when the check fails.
///
/// # Examples
///
/// ```
/// use feedwatch::util::validate_feed_url;
///
/// let url = validate_feed_url("https://example.com/rss?passkey=abc").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_feed_url("example.com/rss").is_err());
/// assert!(validate_feed_url("ftp://example.com/rss").is_err());
/// ```
pub fn validate_feed_url(url_str: &str) -> Result<Url, FeedUrlError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FeedUrlError::UnsupportedScheme(scheme.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_feed_url("http://example.com/feed.xml").is_ok());
        assert!(validate_feed_url("https://tracker.example.org:8080/rss?key=1").is_ok());
        // Local trackers are fine for a monitoring daemon
        assert!(validate_feed_url("http://192.168.1.10/rss").is_ok());
        assert!(validate_feed_url("http://localhost:9091/rss").is_ok());
    }

    #[test]
    fn test_rejects_relative_url() {
        let err = validate_feed_url("feed.xml").unwrap_err();
        assert!(matches!(err, FeedUrlError::InvalidUrl(_)));
    }

    #[test]
    fn test_rejects_empty_host() {
        assert!(validate_feed_url("http://").is_err());
    }

    #[test]
    fn test_rejects_other_schemes() {
        let err = validate_feed_url("file:///etc/passwd").unwrap_err();
        assert!(matches!(err, FeedUrlError::UnsupportedScheme(ref s) if s == "file"));
        assert!(err.to_string().contains("only http/https"));
    }
}
