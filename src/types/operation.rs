//! Operation-related types for the flat-file bank
//!
//! This module defines the requests accepted by the transaction operations,
//! the summaries shown to the caller before a commit, and the receipts returned
//! after one.

use super::account::{AccountNumber, AccountType};
use rust_decimal::Decimal;

/// Request to credit an account
///
/// Account number and amount are raw user input; the operation parses them.
#[derive(Debug, Clone)]
pub struct DepositRequest {
    pub account_number: String,
    pub pin: String,
    pub amount: String,
}

/// Request to debit an account
#[derive(Debug, Clone)]
pub struct WithdrawRequest {
    pub account_number: String,
    pub pin: String,
    pub amount: String,
}

/// Request to move funds between two accounts
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub sender: String,
    pub pin: String,
    pub receiver: String,
    pub amount: String,
}

/// Request to close an account
///
/// Authenticated by the last four characters of the stored identifier plus the PIN.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub account_number: String,
    pub identifier_last4: String,
    pub pin: String,
}

/// A validated operation awaiting the caller's confirmation
///
/// Every field has already been checked against the stored record; declining
/// the confirmation leaves storage untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingOperation {
    Deposit {
        account: AccountNumber,
        name: String,
        amount: Decimal,
        new_balance: Decimal,
    },
    Withdrawal {
        account: AccountNumber,
        name: String,
        amount: Decimal,
        new_balance: Decimal,
    },
    Transfer {
        sender: AccountNumber,
        sender_type: AccountType,
        receiver: AccountNumber,
        receiver_name: String,
        receiver_type: AccountType,
        amount: Decimal,
        fee: Decimal,
        total: Decimal,
    },
    Deletion {
        account: AccountNumber,
        name: String,
        balance: Decimal,
    },
}

/// Result of an operation that asks for confirmation
///
/// `Cancelled` is a successful no-op, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Committed(T),
    Cancelled,
}

impl<T> Outcome<T> {
    /// The committed value, if the caller confirmed
    pub fn committed(self) -> Option<T> {
        match self {
            Outcome::Committed(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }
}

/// Balance of one account before and after a committed deposit or withdrawal
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceChange {
    pub account: AccountNumber,
    pub previous: Decimal,
    pub current: Decimal,
}

/// Both legs of a committed transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub sender: AccountNumber,
    pub receiver: AccountNumber,
    pub amount: Decimal,
    pub fee: Decimal,
    /// Sender balance after the debit of amount plus fee
    pub sender_balance: Decimal,
    /// Receiver balance after the credit of amount
    pub receiver_balance: Decimal,
}

/// Result of opening an account
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatedAccount {
    pub account_number: AccountNumber,
    /// False when the record was written but the index append failed
    pub indexed: bool,
}
