//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account, account number and account type
//! - `operation`: Operation requests, pending confirmations and receipts
//! - `error`: Error types for the bank

pub mod account;
pub mod error;
pub mod operation;

pub use account::{Account, AccountNumber, AccountType, NewAccount};
pub use error::BankError;
pub use operation::{
    BalanceChange, CreatedAccount, DeleteRequest, DepositRequest, Outcome, PendingOperation,
    TransferReceipt, TransferRequest, WithdrawRequest,
};
