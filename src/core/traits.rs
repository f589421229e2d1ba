//! Core traits for account storage
//!
//! The transaction operations only need a handful of record-level calls. This
//! trait puts them behind a seam so the operations can run against the
//! flat-file repository in production and against failure-injecting wrappers
//! in tests.

use crate::types::{Account, AccountNumber, BankError, CreatedAccount, NewAccount};
use rust_decimal::Decimal;

/// Durable storage of account records
///
/// Every call goes to storage; implementations must not cache records
/// between calls.
pub trait AccountStore {
    /// Allocate a unique account number and persist a new record with a zero balance
    fn create(&self, account: NewAccount) -> Result<CreatedAccount, BankError>;

    /// Load the current state of an account
    fn read(&self, account: AccountNumber) -> Result<Account, BankError>;

    /// Persist a new balance for an existing account
    fn update_balance(&self, account: AccountNumber, balance: Decimal) -> Result<(), BankError>;

    /// Remove an account record and its index entry
    fn delete(&self, account: AccountNumber) -> Result<(), BankError>;
}
