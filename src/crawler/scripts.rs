//! In-page functions evaluated through [`BrowserSession::evaluate`]
//!
//! Each constant is a function declaration. Values that vary per call (the
//! item pattern, the link being probed) are passed as bound arguments and
//! never spliced into the script text.
//!
//! [`BrowserSession::evaluate`]: crate::browser::BrowserSession::evaluate

/// `(pattern) -> string[]`: hrefs of every anchor whose resolved href contains `pattern`, in DOM order
pub const DISCOVER_LINKS: &str = r#"function(pattern) {
    return Array.from(document.querySelectorAll('a[href]'))
        .map(a => a.href)
        .filter(href => href.includes(pattern));
}"#;

/// `(link) -> true`: scrolls the anchor for `link` into view, focuses it and dispatches a hover
pub const HOVER_LINK: &str = r#"function(link) {
    const anchor = Array.from(document.querySelectorAll('a[href]')).find(a => a.href === link);
    if (!anchor) {
        throw new Error('anchor not found for ' + link);
    }
    anchor.scrollIntoView({ block: 'center' });
    anchor.focus();
    anchor.classList.remove('hover');
    for (const type of ['mouseover', 'mouseenter']) {
        anchor.dispatchEvent(new MouseEvent(type, { bubbles: true, cancelable: true, view: window }));
    }
    anchor.classList.add('hover');
    return true;
}"#;

/// `(link) -> {image, video}`: static thumbnail src and the preferred preview video src
///
/// The second video source is preferred when present; it is the landscape
/// rendition whose filename carries the game slug.
pub const THUMBNAIL_SOURCES: &str = r#"function(link) {
    const anchor = Array.from(document.querySelectorAll('a[href]')).find(a => a.href === link);
    if (!anchor) {
        return { image: null, video: null };
    }
    const img = anchor.querySelector('img');
    const sources = Array.from(anchor.querySelectorAll('video source'));
    const preferred = sources[1] || sources[0];
    return {
        image: img ? img.getAttribute('src') : null,
        video: preferred && preferred.src ? preferred.src : null,
    };
}"#;

/// `(link) -> string[]`: every preview video source URL inside the anchor
pub const HOVER_MEDIA: &str = r#"function(link) {
    const anchor = Array.from(document.querySelectorAll('a[href]')).find(a => a.href === link);
    if (!anchor) {
        return [];
    }
    return Array.from(anchor.querySelectorAll('video source'))
        .map(source => source.src)
        .filter(src => !!src);
}"#;
