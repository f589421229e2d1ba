//! Account repository module
//!
//! This module provides the `AccountRepository`, which owns the storage
//! directory: one `<accountNumber>.txt` record per account plus `index.txt`.
//!
//! The AccountRepository is responsible for:
//! - Allocating unique account numbers with a bounded retry budget
//! - Creating, reading, rewriting and deleting record files
//! - Keeping the index in step with the records, and rebuilding it on demand
//!
//! # Consistency
//!
//! Each single-file rewrite goes through a temporary file and a rename, so a
//! record is always either fully old or fully new. Nothing spans two files:
//! `delete` removes the record before rewriting the index, and a failure in
//! between leaves a stale index entry. `rebuild_index` repairs that.

use crate::core::traits::AccountStore;
use crate::io::index_store::{IndexEntry, IndexStore};
use crate::io::record_codec::{decode_record, encode_record, rewrite_balance, RecordField};
use crate::io::swap::replace_file;
use crate::types::{Account, AccountNumber, BankError, CreatedAccount, NewAccount};
use rand::Rng;
use rust_decimal::Decimal;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the index inside the storage directory
pub const INDEX_FILE: &str = "index.txt";

/// Number of colliding draws tolerated before giving up
pub const MAX_GENERATION_ATTEMPTS: usize = 100;

/// Draw an account number not yet taken
///
/// Draws uniformly from [`AccountNumber::MIN`, `AccountNumber::MAX`] and redraws
/// whenever `exists` reports a collision.
///
/// # Arguments
///
/// * `rng` - Source of randomness
/// * `exists` - Reports whether a record already uses a number
///
/// # Errors
///
/// Returns `ExhaustedRetries` after [`MAX_GENERATION_ATTEMPTS`] collisions.
pub fn generate_unique_account_number<R, F>(
    rng: &mut R,
    exists: F,
) -> Result<AccountNumber, BankError>
where
    R: Rng + ?Sized,
    F: Fn(AccountNumber) -> bool,
{
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let candidate = AccountNumber::new(rng.gen_range(AccountNumber::MIN..=AccountNumber::MAX))?;
        if !exists(candidate) {
            return Ok(candidate);
        }
        debug!(candidate = %candidate, attempt, "Account number collision");
    }

    Err(BankError::ExhaustedRetries {
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}

/// Flat-file store of account records
#[derive(Debug, Clone)]
pub struct AccountRepository {
    /// Directory holding the records and the index
    root: PathBuf,
    index: IndexStore,
}

impl AccountRepository {
    /// Open (creating if needed) the storage directory at `root`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BankError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| BankError::storage(&root, e))?;
        let index = IndexStore::new(root.join(INDEX_FILE));
        info!(root = %root.display(), "Opened account storage");
        Ok(AccountRepository { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &IndexStore {
        &self.index
    }

    /// Path of the record file for `account`
    pub fn record_path(&self, account: AccountNumber) -> PathBuf {
        self.root.join(format!("{}.txt", account))
    }

    /// Whether a record file exists for `account`
    pub fn exists(&self, account: AccountNumber) -> bool {
        self.record_path(account).exists()
    }

    fn read_text(&self, account: AccountNumber) -> Result<String, BankError> {
        let path = self.record_path(account);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BankError::account_not_found(account),
            _ => BankError::storage(&path, e),
        })
    }

    /// All accounts listed in the index, in insertion order
    pub fn list(&self) -> Result<Vec<IndexEntry>, BankError> {
        self.index.list()
    }

    /// Rebuild the index from the record files on disk
    ///
    /// Records that cannot be decoded are skipped with a warning. Entries are
    /// written in ascending account number order.
    ///
    /// # Returns
    ///
    /// The number of entries in the rebuilt index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be listed or the index
    /// cannot be written.
    pub fn rebuild_index(&self) -> Result<usize, BankError> {
        let dir = fs::read_dir(&self.root).map_err(|e| BankError::storage(&self.root, e))?;

        let mut entries = Vec::new();
        for dir_entry in dir {
            let dir_entry = dir_entry.map_err(|e| BankError::storage(&self.root, e))?;
            let file_name = dir_entry.file_name();
            let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(".txt")) else {
                continue;
            };
            let Ok(number) = stem.parse::<AccountNumber>() else {
                continue;
            };

            match self.read(number) {
                Ok(account) => entries.push(IndexEntry {
                    account_number: account.account_number,
                    name: account.name,
                    identifier: account.identifier,
                    account_type: account.account_type,
                }),
                Err(e) => warn!(account = %number, error = %e, "Skipping unreadable record"),
            }
        }

        entries.sort_by_key(|entry| entry.account_number);
        self.index.replace_all(&entries)?;
        info!(entries = entries.len(), "Rebuilt account index");
        Ok(entries.len())
    }
}

impl AccountStore for AccountRepository {
    /// Create a new account record and index entry
    ///
    /// The record is written with an `Initial Deposit: 0.00` balance line. A
    /// failed index append does not undo the record: it is logged and reported
    /// through `CreatedAccount::indexed`.
    ///
    /// # Errors
    ///
    /// Returns `ExhaustedRetries` if no free number is found, or `StorageError`
    /// if the record cannot be written.
    fn create(&self, request: NewAccount) -> Result<CreatedAccount, BankError> {
        let account_number =
            generate_unique_account_number(&mut rand::thread_rng(), |n| self.exists(n))?;
        let account = request.into_account(account_number);
        let path = self.record_path(account_number);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| BankError::storage(&path, e))?;
        file.write_all(encode_record(&account, RecordField::InitialDeposit).as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| BankError::storage(&path, e))?;

        let entry = IndexEntry {
            account_number,
            name: account.name,
            identifier: account.identifier,
            account_type: account.account_type,
        };
        let indexed = match self.index.append(&entry) {
            Ok(()) => true,
            Err(e) => {
                warn!(account = %account_number, error = %e, "Account created but not indexed");
                false
            }
        };

        info!(account = %account_number, account_type = %entry.account_type, "Created account");
        Ok(CreatedAccount {
            account_number,
            indexed,
        })
    }

    /// Read and decode the record for `account`
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if there is no record file, `StorageError` if
    /// it cannot be read, or `CorruptRecord` if it lacks required fields.
    fn read(&self, account: AccountNumber) -> Result<Account, BankError> {
        let text = self.read_text(account)?;
        let path = self.record_path(account);
        let mut decoded =
            decode_record(&text).map_err(|e| BankError::corrupt_record(&path, &e.to_string()))?;

        if decoded.account_number != account {
            warn!(
                file = %account,
                recorded = %decoded.account_number,
                "Record number does not match its file name, using the file name"
            );
            decoded.account_number = account;
        }
        Ok(decoded)
    }

    /// Rewrite the balance line of `account`
    ///
    /// All other lines are preserved verbatim. The new content is written to a
    /// temporary file first and swapped in only once complete.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if there is no record file, or `StorageError`
    /// if reading, writing or swapping fails. The record is unchanged on error.
    fn update_balance(&self, account: AccountNumber, balance: Decimal) -> Result<(), BankError> {
        let text = self.read_text(account)?;
        let rewritten = rewrite_balance(&text, balance);
        replace_file(&self.record_path(account), rewritten.as_bytes())?;
        debug!(account = %account, balance = %balance, "Updated balance");
        Ok(())
    }

    /// Delete the record of `account`, then its index entry
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if there is no record file, or `StorageError`
    /// if the record cannot be removed or the index cannot be rewritten. In the
    /// latter case the record is already gone and the index is stale.
    fn delete(&self, account: AccountNumber) -> Result<(), BankError> {
        let path = self.record_path(account);
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BankError::account_not_found(account),
            _ => BankError::storage(&path, e),
        })?;

        match self.index.remove(account) {
            Ok(0) => warn!(account = %account, "Deleted account had no index entry"),
            Ok(_) => {}
            Err(e) => {
                warn!(account = %account, error = %e, "Record deleted but index is stale");
                return Err(e);
            }
        }

        info!(account = %account, "Deleted account");
        Ok(())
    }
}
