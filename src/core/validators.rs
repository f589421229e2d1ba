//! Input validators
//!
//! Pure predicates over raw user input. None of them touch storage; the console
//! uses them to re-prompt and the operations use them before parsing.

use crate::types::BankError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// True iff `s` is non-empty and made only of letters and spaces
pub fn validate_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphabetic() || c == ' ')
}

/// True iff `s` is non-empty and made only of ASCII digits
pub fn validate_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// True iff `s` names an account type, ignoring case
pub fn validate_account_type(s: &str) -> bool {
    s.eq_ignore_ascii_case("savings") || s.eq_ignore_ascii_case("current")
}

/// True iff `s` is exactly four ASCII digits
pub fn validate_pin(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_digit())
}

/// True iff `s` is a plain decimal amount with at most two fractional digits
///
/// Accepts `"100"`, `"100.5"`, `"100.50"`, `"5."` and `".5"`. Rejects signs,
/// exponents, separators, a second `.` and strings without any digit.
pub fn validate_money_format(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    let mut digits = 0usize;
    let mut dots = 0usize;
    let mut fractional = 0usize;

    for c in s.chars() {
        match c {
            '0'..='9' => {
                digits += 1;
                if dots == 1 {
                    fractional += 1;
                }
            }
            '.' => dots += 1,
            _ => return false,
        }
    }

    dots <= 1 && fractional <= 2 && digits >= 1
}

/// Parse a monetary amount into a 2-decimal value
///
/// # Errors
///
/// Returns a validation error if `s` fails [`validate_money_format`] or is too
/// large to represent.
pub fn parse_money(s: &str) -> Result<Decimal, BankError> {
    let trimmed = s.trim();
    if !validate_money_format(trimmed) {
        return Err(BankError::validation(
            "amount",
            &format!(
                "'{}' is not a valid amount (digits with at most 2 decimal places)",
                trimmed
            ),
        ));
    }

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = format!("{}.{:0<2}", whole, fraction);

    Decimal::from_str(&normalized)
        .map_err(|_| BankError::validation("amount", &format!("'{}' is too large", trimmed)))
}

/// Length bounds applied to identification numbers
///
/// Early revisions accepted any non-empty digit string; later ones require 7 to
/// 12 digits. The bounds are configurable rather than fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierPolicy {
    /// Minimum number of digits (inclusive)
    pub min_len: usize,
    /// Maximum number of digits (inclusive)
    pub max_len: usize,
}

impl Default for IdentifierPolicy {
    fn default() -> Self {
        Self {
            min_len: 7,
            max_len: 12,
        }
    }
}

impl IdentifierPolicy {
    /// Policy with no length bounds beyond non-emptiness
    pub fn unbounded() -> Self {
        Self {
            min_len: 1,
            max_len: usize::MAX,
        }
    }

    /// True iff `s` is a digit string whose length is within the bounds
    pub fn validate(&self, s: &str) -> bool {
        validate_identifier(s) && (self.min_len..=self.max_len).contains(&s.len())
    }

    /// Human-readable description used in prompts and error messages
    pub fn describe(&self) -> String {
        if self.max_len == usize::MAX {
            "digits only".to_string()
        } else if self.min_len == self.max_len {
            format!("exactly {} digits", self.min_len)
        } else {
            format!("{}-{} digits", self.min_len, self.max_len)
        }
    }
}
