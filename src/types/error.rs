//! Error types for the flat-file bank
//!
//! This module defines all error types that can occur while reading, validating
//! and rewriting account records. Errors are designed to be descriptive and
//! user-friendly, since the console prints them directly.
//!
//! # Error Categories
//!
//! - **Validation Errors**: malformed input, absorbed by the console's re-prompt loop
//! - **Business Rule Errors**: unknown account, wrong credentials, insufficient funds
//! - **Storage Errors**: record or index files that cannot be opened, written or swapped
//! - **Consistency Errors**: a transfer that debited the sender but could not credit
//!   the receiver and could not be rolled back

use super::account::AccountNumber;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the bank
///
/// Every operation returns this type. Apart from `Validation`, each variant
/// aborts the current operation and is reported to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Malformed user input
    ///
    /// Recoverable: the console re-prompts for the offending field.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// No record file exists for the account number
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The account number that was looked up
        account: AccountNumber,
    },

    /// PIN or identifier mismatch
    ///
    /// The operation is aborted with no state change.
    #[error("Authentication failed for account {account}")]
    AuthenticationFailed {
        /// The account whose credentials did not match
        account: AccountNumber,
    },

    /// Balance does not cover the requested debit (fees included)
    #[error(
        "Insufficient funds in account {account}: available {available:.2}, requested {requested:.2}"
    )]
    InsufficientFunds {
        /// Account being debited
        account: AccountNumber,
        /// Balance at the time of the check
        available: Decimal,
        /// Amount that would have been debited
        requested: Decimal,
    },

    /// Sender and receiver of a transfer are the same account
    #[error("Cannot transfer from account {account} to itself")]
    SameAccount {
        /// The account given on both sides
        account: AccountNumber,
    },

    /// Crediting the account would exceed the largest representable balance
    #[error("Balance of account {account} cannot hold {amount:.2} more")]
    BalanceOverflow {
        /// Account that would have been credited
        account: AccountNumber,
        /// Amount that did not fit
        amount: Decimal,
    },

    /// No free account number was found within the retry budget
    #[error("Unable to generate a unique account number after {attempts} attempts")]
    ExhaustedRetries {
        /// Number of draws that collided
        attempts: usize,
    },

    /// A record, index or temporary file could not be opened, written or swapped
    #[error("Storage error on {path}: {message}")]
    StorageError {
        /// File involved in the failure
        path: String,
        /// Description of the underlying I/O failure
        message: String,
    },

    /// A record file exists but lacks required fields
    #[error("Corrupt record {path}: {message}")]
    CorruptRecord {
        /// Record file that failed to decode
        path: String,
        /// What was missing or malformed
        message: String,
    },

    /// The sender was debited, the receiver could not be credited and the
    /// sender could not be restored
    ///
    /// Storage is inconsistent: `debited` left the sender without reaching the
    /// receiver. This requires manual correction.
    #[error("Transfer incomplete: account {sender} was debited {debited:.2} but account {receiver} was not credited")]
    TransferIncomplete {
        /// Account that was debited
        sender: AccountNumber,
        /// Account that should have been credited
        receiver: AccountNumber,
        /// Amount (transfer plus fee) removed from the sender
        debited: Decimal,
    },
}

// Helper functions for creating common errors

impl BankError {
    /// Create a Validation error
    pub fn validation(field: &str, message: &str) -> Self {
        BankError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountNumber) -> Self {
        BankError::AccountNotFound { account }
    }

    /// Create an AuthenticationFailed error
    pub fn authentication_failed(account: AccountNumber) -> Self {
        BankError::AuthenticationFailed { account }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(
        account: AccountNumber,
        available: Decimal,
        requested: Decimal,
    ) -> Self {
        BankError::InsufficientFunds {
            account,
            available,
            requested,
        }
    }

    /// Create a SameAccount error
    pub fn same_account(account: AccountNumber) -> Self {
        BankError::SameAccount { account }
    }

    /// Create a BalanceOverflow error
    pub fn balance_overflow(account: AccountNumber, amount: Decimal) -> Self {
        BankError::BalanceOverflow { account, amount }
    }

    /// Create a StorageError from an I/O failure on a known path
    pub fn storage(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        BankError::StorageError {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Create a CorruptRecord error
    pub fn corrupt_record(path: &std::path::Path, message: &str) -> Self {
        BankError::CorruptRecord {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Whether the console should re-prompt instead of aborting
    pub fn is_validation(&self) -> bool {
        matches!(self, BankError::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::path::Path;

    fn number(value: u32) -> AccountNumber {
        AccountNumber::new(value).unwrap()
    }

    #[rstest]
    #[case::validation(
        BankError::Validation { field: "PIN".to_string(), message: "must be 4 digits".to_string() },
        "Invalid PIN: must be 4 digits"
    )]
    #[case::account_not_found(
        BankError::AccountNotFound { account: number(1234567) },
        "Account 1234567 not found"
    )]
    #[case::authentication_failed(
        BankError::AuthenticationFailed { account: number(1234567) },
        "Authentication failed for account 1234567"
    )]
    #[case::insufficient_funds(
        BankError::InsufficientFunds { account: number(1000002), available: Decimal::new(10000, 2), requested: Decimal::new(20000, 2) },
        "Insufficient funds in account 1000002: available 100.00, requested 200.00"
    )]
    #[case::same_account(
        BankError::SameAccount { account: number(1234567) },
        "Cannot transfer from account 1234567 to itself"
    )]
    #[case::balance_overflow(
        BankError::BalanceOverflow { account: number(1234567), amount: Decimal::new(5000, 2) },
        "Balance of account 1234567 cannot hold 50.00 more"
    )]
    #[case::exhausted_retries(
        BankError::ExhaustedRetries { attempts: 100 },
        "Unable to generate a unique account number after 100 attempts"
    )]
    #[case::storage_error(
        BankError::StorageError { path: "database/index.txt".to_string(), message: "Permission denied".to_string() },
        "Storage error on database/index.txt: Permission denied"
    )]
    #[case::transfer_incomplete(
        BankError::TransferIncomplete { sender: number(1000003), receiver: number(1000004), debited: Decimal::new(10300, 2) },
        "Transfer incomplete: account 1000003 was debited 103.00 but account 1000004 was not credited"
    )]
    fn test_error_display(#[case] error: BankError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::insufficient_funds(
        BankError::insufficient_funds(number(1000002), Decimal::new(5000, 2), Decimal::new(10000, 2)),
        BankError::InsufficientFunds { account: number(1000002), available: Decimal::new(5000, 2), requested: Decimal::new(10000, 2) }
    )]
    #[case::same_account(
        BankError::same_account(number(1234567)),
        BankError::SameAccount { account: number(1234567) }
    )]
    #[case::storage(
        BankError::storage(Path::new("database/1234567.txt"), "disk full"),
        BankError::StorageError { path: "database/1234567.txt".to_string(), message: "disk full".to_string() }
    )]
    fn test_helper_functions(#[case] result: BankError, #[case] expected: BankError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_only_validation_is_recoverable() {
        assert!(BankError::validation("amount", "empty").is_validation());
        assert!(!BankError::account_not_found(number(1234567)).is_validation());
    }
}
