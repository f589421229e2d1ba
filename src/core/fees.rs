//! Transfer fee schedule
//!
//! Fees depend on the ordered pair (sender type, receiver type):
//!
//! | Sender  | Receiver | Rate |
//! |---------|----------|------|
//! | Savings | Current  | 2%   |
//! | Current | Savings  | 3%   |
//! | Savings | Savings  | 0%   |
//! | Current | Current  | 0%   |
//!
//! Fees are charged to the sender on top of the transferred amount and rounded
//! to cents, half away from zero.

use crate::types::AccountType;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fee rate for a transfer from `sender` to `receiver`, as a fraction
pub fn fee_rate(sender: AccountType, receiver: AccountType) -> Decimal {
    match (sender, receiver) {
        (AccountType::Savings, AccountType::Current) => Decimal::new(2, 2),
        (AccountType::Current, AccountType::Savings) => Decimal::new(3, 2),
        (AccountType::Savings, AccountType::Savings)
        | (AccountType::Current, AccountType::Current) => Decimal::ZERO,
    }
}

/// Fee charged for transferring `amount` from `sender` to `receiver`
///
/// Returns `None` if the fee cannot be represented.
pub fn transfer_fee(
    amount: Decimal,
    sender: AccountType,
    receiver: AccountType,
) -> Option<Decimal> {
    amount
        .checked_mul(fee_rate(sender, receiver))
        .map(|fee| fee.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
