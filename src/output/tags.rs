//! Tags file writer

use crate::output::records::{or_not_available, TagGroup, TAG_COLUMNS};
use crate::output::{OutputError, OutputResult};
use std::path::Path;

/// Writes every tag group to `path`, replacing any previous file
///
/// One row per tag, with its group name repeated. Blank cells are written
/// as the sentinel. The rows go to a sibling temporary file first, which is
/// then renamed over `path`, so readers never see a half-written file.
///
/// # Returns
///
/// * `Ok(rows)` - Number of tag rows written
/// * `Err(OutputError)` - The file could not be written
pub fn write_tag_groups(path: impl AsRef<Path>, groups: &[TagGroup]) -> OutputResult<usize> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::Write(format!("not a file path: {}", path.display())))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut rows = 0;
    {
        let mut writer = csv::Writer::from_path(&temp_path)?;
        writer.write_record(TAG_COLUMNS)?;

        for group in groups {
            let group_name = or_not_available(Some(group.group.clone()));
            for tag in &group.tags {
                writer.write_record([
                    group_name.as_str(),
                    &or_not_available(Some(tag.name.clone())),
                    &or_not_available(Some(tag.count.clone())),
                    &or_not_available(Some(tag.url.clone())),
                ])?;
                rows += 1;
            }
        }

        writer
            .flush()
            .map_err(|e| OutputError::Write(e.to_string()))?;
    }

    std::fs::rename(&temp_path, path)?;

    tracing::info!(
        path = %path.display(),
        groups = groups.len(),
        rows,
        "Tags file written"
    );

    Ok(rows)
}
