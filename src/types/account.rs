//! Account-related types for the flat-file bank
//!
//! This module defines the Account structure, the account number newtype and
//! the account type enumeration shared by the codec, repository and operations.

use super::error::BankError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bank account number
///
/// Always within [`AccountNumber::MIN`, `AccountNumber::MAX`] (7 to 9 digits).
/// Construction through [`AccountNumber::new`] or [`FromStr`] enforces the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AccountNumber(u32);

impl AccountNumber {
    /// Smallest valid account number
    pub const MIN: u32 = 1_000_000;

    /// Largest valid account number
    pub const MAX: u32 = 999_999_999;

    /// Create an account number, rejecting values outside the valid range
    ///
    /// # Errors
    ///
    /// Returns a validation error if `value` is not in [1 000 000, 999 999 999].
    pub fn new(value: u32) -> Result<Self, BankError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(AccountNumber(value))
        } else {
            Err(BankError::validation(
                "account number",
                &format!(
                    "{} is outside the range {}-{}",
                    value,
                    Self::MIN,
                    Self::MAX
                ),
            ))
        }
    }

    /// The raw numeric value
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed.parse::<u32>().map_err(|_| {
            BankError::validation(
                "account number",
                &format!("'{}' is not a valid account number", trimmed),
            )
        })?;
        AccountNumber::new(value)
    }
}

impl TryFrom<u32> for AccountNumber {
    type Error = BankError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        AccountNumber::new(value)
    }
}

impl From<AccountNumber> for u32 {
    fn from(number: AccountNumber) -> Self {
        number.0
    }
}

/// Account types offered by the bank
///
/// Parsing is case-insensitive; display always uses the canonical
/// capitalization ("Savings", "Current").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Current,
}

impl AccountType {
    /// Canonical name as written to records and the index
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Current => "Current",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("savings") {
            Ok(AccountType::Savings)
        } else if trimmed.eq_ignore_ascii_case("current") {
            Ok(AccountType::Current)
        } else {
            Err(BankError::validation(
                "account type",
                &format!("'{}' is not 'Savings' or 'Current'", trimmed),
            ))
        }
    }
}

/// A single bank account as persisted in its record file
///
/// The record file is the only durable representation. Operations never cache
/// an Account between calls; they re-read it from the repository each time.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Unique account number, also the record file name
    pub account_number: AccountNumber,

    /// Holder name (letters and spaces only)
    pub name: String,

    /// Holder identification number (digits only)
    pub identifier: String,

    /// Savings or Current
    pub account_type: AccountType,

    /// 4-digit PIN, stored in clear text
    pub pin: String,

    /// Current balance with 2 decimal places
    ///
    /// Never negative after a successful operation.
    pub balance: Decimal,
}

impl Account {
    /// Check a caller-supplied PIN against the stored one
    pub fn pin_matches(&self, pin: &str) -> bool {
        self.pin == pin.trim()
    }

    /// Last four characters of the stored identifier
    ///
    /// Used as the second factor when deleting an account. Identifiers shorter
    /// than four characters are returned whole. Counts characters, so a
    /// hand-edited identifier with multi-byte characters is still sliced safely.
    pub fn identifier_last4(&self) -> &str {
        let start = self
            .identifier
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(index, _)| index);
        &self.identifier[start..]
    }
}

/// Fields needed to open a new account
///
/// The balance is not part of the request: new accounts always start at 0.00.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub identifier: String,
    pub account_type: AccountType,
    pub pin: String,
}

impl NewAccount {
    /// Materialize the account under an allocated number with a zero balance
    pub fn into_account(self, account_number: AccountNumber) -> Account {
        Account {
            account_number,
            name: self.name,
            identifier: self.identifier,
            account_type: self.account_type,
            pin: self.pin,
            balance: Decimal::ZERO,
        }
    }
}
