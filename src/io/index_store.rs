//! Account index handling
//!
//! The index is a secondary, pipe-delimited listing of every account:
//!
//! ```text
//! 1234567|John Smith|1234567|Savings
//! 7654321|Jane Doe|99887766|Current
//! ```
//!
//! One line per account, insertion order, no header. It is used for enumeration
//! only; single-account operations never depend on it.
//!
//! Reading is lenient: malformed lines are logged and skipped, the same way a
//! malformed CSV row would be.

use crate::io::swap::replace_file;
use crate::types::{AccountNumber, AccountType, BankError};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DELIMITER: u8 = b'|';

/// One line of the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub account_number: AccountNumber,
    pub name: String,
    pub identifier: String,
    pub account_type: AccountType,
}

/// Flat-file index of all accounts
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    /// Create a store backed by the file at `path`
    ///
    /// The file is not touched until the first read or write; a missing file
    /// reads as an empty index.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        IndexStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader<R: Read>(source: R) -> csv::Reader<R> {
        ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(source)
    }

    fn writer<W: Write>(sink: W) -> csv::Writer<W> {
        WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_writer(sink)
    }

    /// Open the index for reading, or `None` if it does not exist yet
    fn open(&self) -> Result<Option<File>, BankError> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BankError::storage(&self.path, e)),
        }
    }

    /// Append one entry at the end of the index
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the index cannot be opened or written.
    pub fn append(&self, entry: &IndexEntry) -> Result<(), BankError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BankError::storage(&self.path, e))?;

        let mut writer = Self::writer(file);
        writer
            .serialize(entry)
            .map_err(|e| BankError::storage(&self.path, e))?;
        writer
            .flush()
            .map_err(|e| BankError::storage(&self.path, e))?;

        debug!(account = %entry.account_number, "Appended index entry");
        Ok(())
    }

    /// All well-formed entries, in file order
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the index exists but cannot be read.
    pub fn list(&self) -> Result<Vec<IndexEntry>, BankError> {
        let Some(file) = self.open()? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::new();
        for (line, result) in Self::reader(file).deserialize::<IndexEntry>().enumerate() {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!(path = %self.path.display(), line = line + 1, error = %e, "Skipping malformed index line");
                }
            }
        }
        Ok(entries)
    }

    /// Number of well-formed entries
    pub fn count(&self) -> Result<usize, BankError> {
        self.list().map(|entries| entries.len())
    }

    /// Rewrite the index without the entry for `account`
    ///
    /// Reads every line, drops those whose first column is `account`, writes the
    /// rest to a temporary file and swaps it into place. Lines whose first
    /// column is not an account number are kept as they are; only
    /// `rebuild_index` discards them.
    ///
    /// # Returns
    ///
    /// The number of lines removed for `account` (normally 0 or 1).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the index cannot be read or rewritten; the
    /// original index is then unchanged.
    pub fn remove(&self, account: AccountNumber) -> Result<usize, BankError> {
        let Some(file) = self.open()? else {
            return Ok(0);
        };

        let mut kept: Vec<StringRecord> = Vec::new();
        let mut removed = 0;
        for result in Self::reader(file).records() {
            let record = result.map_err(|e| BankError::storage(&self.path, e))?;
            match record.get(0).map(str::parse::<AccountNumber>) {
                Some(Ok(number)) if number == account => removed += 1,
                Some(Ok(_)) => kept.push(record),
                _ => {
                    warn!(path = %self.path.display(), line = ?record, "Keeping malformed index line");
                    kept.push(record);
                }
            }
        }

        let mut writer = Self::writer(Vec::new());
        for record in &kept {
            writer
                .write_record(record)
                .map_err(|e| BankError::storage(&self.path, e))?;
        }
        let contents = writer
            .into_inner()
            .map_err(|e| BankError::storage(&self.path, e.error()))?;
        replace_file(&self.path, &contents)?;

        debug!(account = %account, removed, "Removed index entry");
        Ok(removed)
    }

    /// Replace the whole index with `entries`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the new index cannot be written.
    pub fn replace_all(&self, entries: &[IndexEntry]) -> Result<(), BankError> {
        let mut writer = Self::writer(Vec::new());
        for entry in entries {
            writer
                .serialize(entry)
                .map_err(|e| BankError::storage(&self.path, e))?;
        }
        let contents = writer
            .into_inner()
            .map_err(|e| BankError::storage(&self.path, e.error()))?;
        replace_file(&self.path, &contents)
    }
}
