use crate::UrlError;
use std::collections::HashSet;
use url::Url;

/// Parses a URL and rejects anything that is not HTTP or HTTPS
///
/// # Examples
///
/// ```
/// use game_catalog_crawler::url::parse_http_url;
///
/// let url = parse_http_url("https://www.example.com/game/tower").unwrap();
/// assert_eq!(url.path(), "/game/tower");
/// assert!(parse_http_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Resolves an href found on a page to an absolute URL
///
/// Returns None if the link should be ignored:
/// - empty and fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - anything that is not HTTP(S) after resolution
pub fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

/// Returns true if `url` is an absolute HTTP(S) URL containing `pattern`
pub fn is_item_url(url: &str, pattern: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && url.contains(pattern)
}

/// Drops repeated URLs, keeping the first occurrence of each
pub fn dedup_preserving_order<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
