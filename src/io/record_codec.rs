//! Account record format handling
//!
//! This module centralizes the on-disk record format, providing:
//! - `RecordField`, the ordered schema of `Key: value` lines
//! - `encode_record` for writing a whole record
//! - `decode_record` for reading one back into an [`Account`]
//! - `rewrite_balance` for replacing the balance line of an existing record
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Format
//!
//! ```text
//! Name: John Smith
//! ID: 1234567
//! Account Type: Savings
//! PIN: 1234
//! Account Number: 1234567
//! Initial Deposit: 0.00
//! ```
//!
//! A freshly created record carries `Initial Deposit`. The first balance change
//! collapses it into a single `Current Balance` line.

use crate::types::{Account, AccountNumber, AccountType};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// One `Key: value` line of a record, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Name,
    Id,
    AccountType,
    Pin,
    AccountNumber,
    InitialDeposit,
    CurrentBalance,
}

impl RecordField {
    /// Identity fields in the order they are written
    pub const IDENTITY: [RecordField; 5] = [
        RecordField::Name,
        RecordField::Id,
        RecordField::AccountType,
        RecordField::Pin,
        RecordField::AccountNumber,
    ];

    /// The key written before the colon
    pub fn tag(self) -> &'static str {
        match self {
            RecordField::Name => "Name",
            RecordField::Id => "ID",
            RecordField::AccountType => "Account Type",
            RecordField::Pin => "PIN",
            RecordField::AccountNumber => "Account Number",
            RecordField::InitialDeposit => "Initial Deposit",
            RecordField::CurrentBalance => "Current Balance",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Name" => Some(RecordField::Name),
            "ID" => Some(RecordField::Id),
            "Account Type" => Some(RecordField::AccountType),
            "PIN" => Some(RecordField::Pin),
            "Account Number" => Some(RecordField::AccountNumber),
            "Initial Deposit" => Some(RecordField::InitialDeposit),
            "Current Balance" => Some(RecordField::CurrentBalance),
            _ => None,
        }
    }

    /// Whether this line carries the balance
    pub fn is_balance(self) -> bool {
        matches!(
            self,
            RecordField::InitialDeposit | RecordField::CurrentBalance
        )
    }

    /// Split a record line into its field and value
    ///
    /// Returns `None` for lines whose key is not part of the schema. The value
    /// loses its single separating space and any line terminator.
    pub fn parse_line(line: &str) -> Option<(RecordField, &str)> {
        let line = line.trim_end_matches(['\n', '\r']);
        let (tag, value) = line.split_once(':')?;
        let field = RecordField::from_tag(tag)?;
        Some((field, value.strip_prefix(' ').unwrap_or(value)))
    }
}

/// Why a record could not be decoded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordParseError {
    #[error("missing '{0}' line")]
    MissingField(&'static str),

    #[error("invalid '{field}' value '{value}'")]
    InvalidField { field: &'static str, value: String },
}

fn balance_line(field: RecordField, balance: Decimal) -> String {
    format!("{}: {:.2}\n", field.tag(), balance)
}

/// Encode a full record
///
/// `balance_field` selects the tag of the final line: `InitialDeposit` for a
/// record that has never been mutated, `CurrentBalance` otherwise.
pub fn encode_record(account: &Account, balance_field: RecordField) -> String {
    let values = [
        account.name.clone(),
        account.identifier.clone(),
        account.account_type.to_string(),
        account.pin.clone(),
        account.account_number.to_string(),
    ];

    let mut out = String::new();
    for (field, value) in RecordField::IDENTITY.iter().zip(values) {
        out.push_str(&format!("{}: {}\n", field.tag(), value));
    }
    out.push_str(&balance_line(balance_field, account.balance));
    out
}

/// Decode a record into an Account
///
/// Lines are matched by key, not position. Unknown lines are ignored. When both
/// balance tags are present the later line wins. A missing or unparseable
/// balance decodes as 0.00.
///
/// # Errors
///
/// Returns an error if a name, ID, account type, PIN or account number line is
/// missing, or if the account type or number is malformed.
pub fn decode_record(text: &str) -> Result<Account, RecordParseError> {
    let mut name = None;
    let mut identifier = None;
    let mut account_type = None;
    let mut pin = None;
    let mut account_number = None;
    let mut balance = None;

    for line in text.lines() {
        let Some((field, value)) = RecordField::parse_line(line) else {
            continue;
        };

        match field {
            RecordField::Name => name = Some(value.to_string()),
            RecordField::Id => identifier = Some(value.trim().to_string()),
            RecordField::AccountType => {
                let parsed = AccountType::from_str(value).map_err(|_| {
                    RecordParseError::InvalidField {
                        field: field.tag(),
                        value: value.to_string(),
                    }
                })?;
                account_type = Some(parsed);
            }
            RecordField::Pin => pin = Some(value.trim().to_string()),
            RecordField::AccountNumber => {
                let parsed = AccountNumber::from_str(value).map_err(|_| {
                    RecordParseError::InvalidField {
                        field: field.tag(),
                        value: value.to_string(),
                    }
                })?;
                account_number = Some(parsed);
            }
            RecordField::InitialDeposit | RecordField::CurrentBalance => {
                let parsed = Decimal::from_str(value.trim()).unwrap_or_else(|_| {
                    warn!(field = field.tag(), value, "Unparseable balance, using 0.00");
                    Decimal::ZERO
                });
                balance = Some(parsed);
            }
        }
    }

    Ok(Account {
        name: name.ok_or(RecordParseError::MissingField(RecordField::Name.tag()))?,
        identifier: identifier.ok_or(RecordParseError::MissingField(RecordField::Id.tag()))?,
        account_type: account_type
            .ok_or(RecordParseError::MissingField(RecordField::AccountType.tag()))?,
        pin: pin.ok_or(RecordParseError::MissingField(RecordField::Pin.tag()))?,
        account_number: account_number
            .ok_or(RecordParseError::MissingField(RecordField::AccountNumber.tag()))?,
        balance: balance.unwrap_or_else(|| {
            warn!("Record has no balance line, using 0.00");
            Decimal::ZERO
        }),
    })
}

/// Replace the balance of an existing record
///
/// The first balance line (either tag) becomes a canonical `Current Balance`
/// line and any further balance lines are dropped. Every other line is kept
/// verbatim and in order. If the record had no balance line one is appended.
pub fn rewrite_balance(text: &str, new_balance: Decimal) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut replaced = false;

    for line in text.split_inclusive('\n') {
        match RecordField::parse_line(line) {
            Some((field, _)) if field.is_balance() => {
                if !replaced {
                    out.push_str(&balance_line(RecordField::CurrentBalance, new_balance));
                    replaced = true;
                }
            }
            _ => out.push_str(line),
        }
    }

    if !replaced {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&balance_line(RecordField::CurrentBalance, new_balance));
    }

    out
}
