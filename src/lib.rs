//! Flat-file Bank Library
//! # Overview
//!
//! This library manages bank accounts persisted as plain text: one record file
//! per account (`<account number>.txt`) and a pipe-delimited `index.txt` listing
//! every account.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, AccountNumber, requests, receipts, errors)
//! - [`cli`] - CLI arguments, prompting and the interactive console
//! - [`core`] - Business logic components:
//!   - [`core::validators`] - Input predicates and the identifier policy
//!   - [`core::repository`] - Record files, index upkeep and account number allocation
//!   - [`core::bank`] - Open, deposit, withdraw, transfer and delete operations
//!   - [`core::fees`] - Transfer fee schedule
//! - [`io`] - Record codec, index store and atomic file replacement
//!
//! # Operations
//!
//! - **Open**: Create an account with a zero balance and a fresh random number
//! - **Deposit**: Credit up to 50000.00 after PIN check and confirmation
//! - **Withdraw**: Debit up to the current balance
//! - **Transfer**: Move funds between accounts, charging a fee when account types differ
//! - **Delete**: Remove the record and its index entry after identity checks
//!
//! Every mutating operation shows a pending summary and only writes once the
//! caller confirms it.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{AccountRepository, AccountStore, Bank, BankConfig, IdentifierPolicy};
pub use io::{IndexEntry, IndexStore};
pub use types::{
    Account, AccountNumber, AccountType, BankError, NewAccount, Outcome, PendingOperation,
};
