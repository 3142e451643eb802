//! Reading back an existing items file

use crate::output::records::{ITEM_COLUMNS, NOT_AVAILABLE};
use crate::output::OutputResult;
use std::collections::HashSet;
use std::path::Path;

/// Index of the URL column in the items file
const URL_COLUMN: usize = 1;

/// Loads the URL of every record already present in an items file
///
/// A missing file yields an empty set. Rows too short to carry a URL and
/// rows whose URL is the sentinel are ignored.
pub fn load_existing_urls(path: impl AsRef<Path>) -> OutputResult<HashSet<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(HashSet::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut urls = HashSet::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if index == 0 && record.get(0) == Some(ITEM_COLUMNS[0]) {
            continue;
        }
        match record.get(URL_COLUMN) {
            Some(url) if !url.is_empty() && url != NOT_AVAILABLE => {
                urls.insert(url.to_string());
            }
            _ => {}
        }
    }

    tracing::debug!(path = %path.display(), urls = urls.len(), "Loaded existing item URLs");

    Ok(urls)
}
