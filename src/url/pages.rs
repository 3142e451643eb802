use crate::url::normalize::parse_http_url;
use crate::UrlError;
use url::Url;

/// Builds the URL of page `page` of a paginated listing
///
/// Page 1 is the listing URL itself; page n > 1 appends `n` as one more
/// path segment, so `https://site/t/car` becomes `https://site/t/car/3`.
/// A trailing slash on the listing URL is absorbed; query strings are kept.
///
/// # Examples
///
/// ```
/// use game_catalog_crawler::url::page_url;
///
/// assert_eq!(page_url("https://x.com/t/car", 1).unwrap().as_str(), "https://x.com/t/car");
/// assert_eq!(page_url("https://x.com/t/car/", 2).unwrap().as_str(), "https://x.com/t/car/2");
/// ```
pub fn page_url(listing: &str, page: u32) -> Result<Url, UrlError> {
    let mut url = parse_http_url(listing)?;

    if page <= 1 {
        return Ok(url);
    }

    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase(listing.to_string()))?
        .pop_if_empty()
        .push(&page.to_string());

    Ok(url)
}
