//! Append-only writer for the items file
//!
//! The items CSV is the only store of extracted records. Every append writes
//! one complete record with a single `write_all` and flushes before
//! returning, so a process kill can at worst tear the record being written.
//! A torn final record is cut off the next time the file is opened.

use crate::output::records::{ItemRecord, ITEM_COLUMNS};
use crate::output::{OutputError, OutputResult};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Durable, append-only destination for [`ItemRecord`]s
#[derive(Debug)]
pub struct RecordSink {
    path: PathBuf,
    file: File,
    has_header: bool,
    written: u64,
}

impl RecordSink {
    /// Opens or creates the items file for appending
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the items CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(RecordSink)` - Ready to append
    /// * `Err(OutputError)` - The file could not be opened or repaired
    pub fn open(path: impl AsRef<Path>) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let truncated = repair_torn_tail(&path)?;
        if truncated > 0 {
            tracing::warn!(
                path = %path.display(),
                bytes = truncated,
                "Removed incomplete trailing record from items file"
            );
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let has_header = file.metadata()?.len() > 0;

        Ok(Self {
            path,
            file,
            has_header,
            written: 0,
        })
    }

    /// Appends one record, writing the header first if the file is empty
    ///
    /// The record is on disk (flushed to the OS) when this returns.
    pub fn append(&mut self, record: &ItemRecord) -> OutputResult<()> {
        let mut row = record.clone();
        row.fill_missing();

        let mut buffer = Vec::new();
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut buffer);
            if !self.has_header {
                writer.write_record(ITEM_COLUMNS)?;
            }
            writer.write_record(row.fields())?;
            writer
                .flush()
                .map_err(|e| OutputError::Write(e.to_string()))?;
        }

        self.file.write_all(&buffer)?;
        self.file.flush()?;

        self.has_header = true;
        self.written += 1;

        tracing::debug!(
            path = %self.path.display(),
            name = %row.name,
            "Record appended"
        );

        Ok(())
    }

    /// Number of records appended through this sink
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Truncates an incomplete final record left by an interrupted append
///
/// A complete record ends with a newline and has as many fields as the
/// header. If the last record fails either check, the bytes from its start
/// to the end of the file are removed. Returns the number of bytes removed.
fn repair_torn_tail(path: &Path) -> OutputResult<u64> {
    let mut file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(0);
    }

    let mut last_byte = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last_byte)?;
    let ends_with_newline = last_byte[0] == b'\n';

    file.seek(SeekFrom::Start(0))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(&mut file);

    let mut record = csv::ByteRecord::new();
    let mut header_len = None;
    let mut last_start = 0;
    let mut last_len = 0;
    loop {
        let start = reader.position().byte();
        if !reader.read_byte_record(&mut record)? {
            break;
        }
        header_len.get_or_insert(record.len());
        last_start = start;
        last_len = record.len();
    }
    drop(reader);

    let complete = ends_with_newline && header_len == Some(last_len);
    if complete {
        return Ok(0);
    }

    file.set_len(last_start)?;
    file.sync_all()?;

    Ok(len - last_start)
}
