//! Bank operations
//!
//! This module provides the `Bank`, which runs each user-facing operation
//! against an [`AccountStore`]. Every operation follows the same short
//! sequence:
//!
//! 1. Identify: parse the account number
//! 2. Load: read the record (fails fast if absent)
//! 3. Authenticate: compare the supplied credentials with the record
//! 4. Validate: amount and target checks for the operation
//! 5. Confirm: hand a [`PendingOperation`] to the caller, who may decline
//! 6. Commit: rewrite the affected record(s)
//!
//! Any failure before step 6 leaves storage untouched.
//!
//! # Transfers
//!
//! A transfer writes two records, sender first. If the receiver write fails
//! the sender's previous balance is written back. If that also fails, the
//! operation reports [`BankError::TransferIncomplete`]: the sender has been
//! debited and the receiver has not been credited.

use crate::core::fees::transfer_fee;
use crate::core::traits::AccountStore;
use crate::core::validators::{
    parse_money, validate_account_type, validate_name, validate_pin, IdentifierPolicy,
};
use crate::types::{
    Account, AccountNumber, AccountType, BalanceChange, BankError, CreatedAccount, DeleteRequest,
    DepositRequest, NewAccount, Outcome, PendingOperation, TransferReceipt, TransferRequest,
    WithdrawRequest,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{error, info, warn};

/// Largest amount accepted by a single deposit
pub const MAX_DEPOSIT: Decimal = Decimal::from_parts(5_000_000, 0, 0, false, 2);

/// Entry point for all account operations
///
/// Holds no account state of its own; every call re-reads storage.
pub struct Bank<S: AccountStore> {
    store: S,
    identifier_policy: IdentifierPolicy,
}

impl<S: AccountStore> Bank<S> {
    /// Create a Bank over `store`
    pub fn new(store: S, identifier_policy: IdentifierPolicy) -> Self {
        Bank {
            store,
            identifier_policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn identifier_policy(&self) -> IdentifierPolicy {
        self.identifier_policy
    }

    /// Parse, load and check the PIN of an account
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed number, `AccountNotFound` if
    /// there is no record, or `AuthenticationFailed` on a PIN mismatch.
    pub fn authenticate(&self, account_number: &str, pin: &str) -> Result<Account, BankError> {
        let number = AccountNumber::from_str(account_number)?;
        let account = self.store.read(number)?;
        if !account.pin_matches(pin) {
            warn!(account = %number, "PIN mismatch");
            return Err(BankError::authentication_failed(number));
        }
        Ok(account)
    }

    /// Open a new account with a zero balance
    ///
    /// # Arguments
    ///
    /// * `name` - Letters and spaces only
    /// * `identifier` - Digits only, length within the identifier policy
    /// * `account_type` - "Savings" or "Current", any case
    /// * `pin` - Exactly four digits
    ///
    /// # Errors
    ///
    /// Returns a validation error for the first invalid field, otherwise any
    /// error from [`AccountStore::create`].
    pub fn open_account(
        &self,
        name: &str,
        identifier: &str,
        account_type: &str,
        pin: &str,
    ) -> Result<CreatedAccount, BankError> {
        if !validate_name(name) {
            return Err(BankError::validation(
                "name",
                "use only letters and spaces",
            ));
        }
        if !self.identifier_policy.validate(identifier) {
            return Err(BankError::validation(
                "identification number",
                &format!("use {}", self.identifier_policy.describe()),
            ));
        }
        if !validate_account_type(account_type) {
            return Err(BankError::validation(
                "account type",
                "enter 'Savings' or 'Current'",
            ));
        }
        if !validate_pin(pin) {
            return Err(BankError::validation("PIN", "enter exactly 4 digits"));
        }

        self.store.create(NewAccount {
            name: name.to_string(),
            identifier: identifier.to_string(),
            account_type: AccountType::from_str(account_type)?,
            pin: pin.to_string(),
        })
    }

    /// Credit an account
    ///
    /// The amount must be greater than zero and at most [`MAX_DEPOSIT`].
    ///
    /// # Returns
    ///
    /// * `Outcome::Committed(BalanceChange)` once the new balance is stored
    /// * `Outcome::Cancelled` if `confirm` declined
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails, the amount is invalid, the
    /// new balance cannot be represented (`BalanceOverflow`), or the record
    /// cannot be rewritten.
    pub fn deposit<C>(
        &self,
        request: &DepositRequest,
        confirm: C,
    ) -> Result<Outcome<BalanceChange>, BankError>
    where
        C: FnOnce(&PendingOperation) -> bool,
    {
        let account = self.authenticate(&request.account_number, &request.pin)?;
        let amount = parse_money(&request.amount)?;

        if amount <= Decimal::ZERO {
            return Err(BankError::validation("amount", "must be greater than 0"));
        }
        if amount > MAX_DEPOSIT {
            return Err(BankError::validation(
                "amount",
                &format!("cannot exceed {:.2} per deposit", MAX_DEPOSIT),
            ));
        }

        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::balance_overflow(account.account_number, amount))?;
        let pending = PendingOperation::Deposit {
            account: account.account_number,
            name: account.name.clone(),
            amount,
            new_balance,
        };
        if !confirm(&pending) {
            info!(account = %account.account_number, "Deposit cancelled");
            return Ok(Outcome::Cancelled);
        }

        self.store
            .update_balance(account.account_number, new_balance)?;
        info!(account = %account.account_number, amount = %amount, balance = %new_balance, "Deposit committed");

        Ok(Outcome::Committed(BalanceChange {
            account: account.account_number,
            previous: account.balance,
            current: new_balance,
        }))
    }

    /// Debit an account
    ///
    /// An account with no funds is rejected before the amount is looked at.
    /// The amount must be greater than zero and no more than the balance.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if the balance is zero or below the amount,
    /// a validation error for a malformed or non-positive amount, or any
    /// authentication or storage error.
    pub fn withdraw<C>(
        &self,
        request: &WithdrawRequest,
        confirm: C,
    ) -> Result<Outcome<BalanceChange>, BankError>
    where
        C: FnOnce(&PendingOperation) -> bool,
    {
        let account = self.authenticate(&request.account_number, &request.pin)?;
        if account.balance <= Decimal::ZERO {
            return Err(BankError::insufficient_funds(
                account.account_number,
                account.balance,
                Decimal::ZERO,
            ));
        }

        let amount = parse_money(&request.amount)?;
        if amount <= Decimal::ZERO {
            return Err(BankError::validation("amount", "must be greater than 0"));
        }
        if amount > account.balance {
            return Err(BankError::insufficient_funds(
                account.account_number,
                account.balance,
                amount,
            ));
        }

        let new_balance = account.balance - amount;
        let pending = PendingOperation::Withdrawal {
            account: account.account_number,
            name: account.name.clone(),
            amount,
            new_balance,
        };
        if !confirm(&pending) {
            info!(account = %account.account_number, "Withdrawal cancelled");
            return Ok(Outcome::Cancelled);
        }

        self.store
            .update_balance(account.account_number, new_balance)?;
        info!(account = %account.account_number, amount = %amount, balance = %new_balance, "Withdrawal committed");

        Ok(Outcome::Committed(BalanceChange {
            account: account.account_number,
            previous: account.balance,
            current: new_balance,
        }))
    }

    /// Move funds from one account to another
    ///
    /// The sender pays the amount plus a fee that depends on both account
    /// types (see [`crate::core::fees`]); the receiver gets the amount.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sender cannot be authenticated
    /// - Sender and receiver are the same account (`SameAccount`)
    /// - The receiver does not exist
    /// - The amount is malformed or not positive
    /// - Amount plus fee exceeds the sender's balance (`InsufficientFunds`)
    /// - The receiver's balance cannot hold the amount (`BalanceOverflow`)
    /// - A record cannot be rewritten (`StorageError`, or `TransferIncomplete`
    ///   if the sender was debited and could not be restored)
    pub fn transfer<C>(
        &self,
        request: &TransferRequest,
        confirm: C,
    ) -> Result<Outcome<TransferReceipt>, BankError>
    where
        C: FnOnce(&PendingOperation) -> bool,
    {
        let sender = self.authenticate(&request.sender, &request.pin)?;
        let receiver_number = AccountNumber::from_str(&request.receiver)?;
        if receiver_number == sender.account_number {
            return Err(BankError::same_account(receiver_number));
        }
        let receiver = self.store.read(receiver_number)?;

        let amount = parse_money(&request.amount)?;
        if amount <= Decimal::ZERO {
            return Err(BankError::validation("amount", "must be greater than 0"));
        }

        let shortfall = |requested: Decimal| {
            BankError::insufficient_funds(sender.account_number, sender.balance, requested)
        };
        if amount > sender.balance {
            return Err(shortfall(amount));
        }
        let fee = transfer_fee(amount, sender.account_type, receiver.account_type)
            .ok_or_else(|| shortfall(amount))?;
        let total = amount.checked_add(fee).ok_or_else(|| shortfall(amount))?;
        if total > sender.balance {
            return Err(shortfall(total));
        }
        let receiver_balance = receiver
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::balance_overflow(receiver.account_number, amount))?;

        let pending = PendingOperation::Transfer {
            sender: sender.account_number,
            sender_type: sender.account_type,
            receiver: receiver.account_number,
            receiver_name: receiver.name.clone(),
            receiver_type: receiver.account_type,
            amount,
            fee,
            total,
        };
        if !confirm(&pending) {
            info!(sender = %sender.account_number, receiver = %receiver.account_number, "Transfer cancelled");
            return Ok(Outcome::Cancelled);
        }

        let sender_balance = sender.balance - total;

        self.store
            .update_balance(sender.account_number, sender_balance)?;

        if let Err(credit_error) = self
            .store
            .update_balance(receiver.account_number, receiver_balance)
        {
            error!(
                sender = %sender.account_number,
                receiver = %receiver.account_number,
                error = %credit_error,
                "Receiver credit failed, restoring sender"
            );
            return match self
                .store
                .update_balance(sender.account_number, sender.balance)
            {
                Ok(()) => Err(credit_error),
                Err(restore_error) => {
                    error!(
                        sender = %sender.account_number,
                        debited = %total,
                        error = %restore_error,
                        "Sender could not be restored, storage is inconsistent"
                    );
                    Err(BankError::TransferIncomplete {
                        sender: sender.account_number,
                        receiver: receiver.account_number,
                        debited: total,
                    })
                }
            };
        }

        info!(
            sender = %sender.account_number,
            receiver = %receiver.account_number,
            amount = %amount,
            fee = %fee,
            "Transfer committed"
        );

        Ok(Outcome::Committed(TransferReceipt {
            sender: sender.account_number,
            receiver: receiver.account_number,
            amount,
            fee,
            sender_balance,
            receiver_balance,
        }))
    }

    /// Close an account
    ///
    /// Requires the last four characters of the stored identifier and the
    /// PIN, then a final confirmation.
    ///
    /// # Returns
    ///
    /// * `Outcome::Committed(Account)` with the state of the removed account
    /// * `Outcome::Cancelled` if `confirm` declined
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if either credential is wrong, or any
    /// error from [`AccountStore::delete`].
    pub fn delete_account<C>(
        &self,
        request: &DeleteRequest,
        confirm: C,
    ) -> Result<Outcome<Account>, BankError>
    where
        C: FnOnce(&PendingOperation) -> bool,
    {
        let number = AccountNumber::from_str(&request.account_number)?;
        let account = self.store.read(number)?;

        if account.identifier_last4() != request.identifier_last4.trim()
            || !account.pin_matches(&request.pin)
        {
            warn!(account = %number, "Deletion credentials mismatch");
            return Err(BankError::authentication_failed(number));
        }

        let pending = PendingOperation::Deletion {
            account: number,
            name: account.name.clone(),
            balance: account.balance,
        };
        if !confirm(&pending) {
            info!(account = %number, "Deletion cancelled");
            return Ok(Outcome::Cancelled);
        }

        self.store.delete(number)?;
        Ok(Outcome::Committed(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::AccountRepository;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use tempfile::TempDir;

    /// Repository wrapper that fails balance updates for chosen accounts
    struct FailingStore {
        inner: AccountRepository,
        fail_updates: RefCell<HashSet<AccountNumber>>,
        /// Accounts whose failure is armed only after their first successful write
        fail_after_first: RefCell<HashSet<AccountNumber>>,
    }

    impl AccountStore for FailingStore {
        fn create(&self, account: NewAccount) -> Result<CreatedAccount, BankError> {
            self.inner.create(account)
        }

        fn read(&self, account: AccountNumber) -> Result<Account, BankError> {
            self.inner.read(account)
        }

        fn update_balance(&self, account: AccountNumber, balance: Decimal) -> Result<(), BankError> {
            if self.fail_updates.borrow().contains(&account) {
                return Err(BankError::StorageError {
                    path: format!("{}.txt", account),
                    message: "injected failure".to_string(),
                });
            }
            self.inner.update_balance(account, balance)?;
            if self.fail_after_first.borrow_mut().remove(&account) {
                self.fail_updates.borrow_mut().insert(account);
            }
            Ok(())
        }

        fn delete(&self, account: AccountNumber) -> Result<(), BankError> {
            self.inner.delete(account)
        }
    }

    fn bank() -> (TempDir, Bank<AccountRepository>) {
        let dir = TempDir::new().unwrap();
        let repo = AccountRepository::open(dir.path()).unwrap();
        (dir, Bank::new(repo, IdentifierPolicy::default()))
    }

    fn open(bank: &Bank<impl AccountStore>, account_type: &str, pin: &str) -> AccountNumber {
        bank.open_account("Test Holder", "1234567890", account_type, pin)
            .unwrap()
            .account_number
    }

    fn fund<S: AccountStore>(bank: &Bank<S>, account: AccountNumber, balance: Decimal) {
        bank.store().update_balance(account, balance).unwrap();
    }

    fn balance<S: AccountStore>(bank: &Bank<S>, account: AccountNumber) -> Decimal {
        bank.store().read(account).unwrap().balance
    }

    fn deposit_request(account: AccountNumber, pin: &str, amount: &str) -> DepositRequest {
        DepositRequest {
            account_number: account.to_string(),
            pin: pin.to_string(),
            amount: amount.to_string(),
        }
    }

    fn withdraw_request(account: AccountNumber, pin: &str, amount: &str) -> WithdrawRequest {
        WithdrawRequest {
            account_number: account.to_string(),
            pin: pin.to_string(),
            amount: amount.to_string(),
        }
    }

    fn transfer_request(sender: AccountNumber, receiver: AccountNumber, amount: &str) -> TransferRequest {
        TransferRequest {
            sender: sender.to_string(),
            pin: "1111".to_string(),
            receiver: receiver.to_string(),
            amount: amount.to_string(),
        }
    }

    fn yes(_: &PendingOperation) -> bool {
        true
    }

    fn no(_: &PendingOperation) -> bool {
        false
    }

    #[rstest]
    #[case::bad_name("J0hn", "1234567", "Savings", "1234", "name")]
    #[case::short_identifier("John", "123456", "Savings", "1234", "identification number")]
    #[case::bad_type("John", "1234567", "Checking", "1234", "account type")]
    #[case::bad_pin("John", "1234567", "Savings", "12345", "PIN")]
    fn test_open_account_validates_fields(
        #[case] name: &str,
        #[case] identifier: &str,
        #[case] account_type: &str,
        #[case] pin: &str,
        #[case] field: &str,
    ) {
        let (_dir, bank) = bank();
        let result = bank.open_account(name, identifier, account_type, pin);
        assert!(matches!(result, Err(BankError::Validation { field: f, .. }) if f == field));
    }

    #[test]
    fn test_open_account_normalizes_type() {
        let (_dir, bank) = bank();
        let number = open(&bank, "cUrReNt", "1234");
        let account = bank.store().read(number).unwrap();
        assert_eq!(account.account_type, AccountType::Current);
        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[rstest]
    #[case::small("0.01", Decimal::new(1, 2))]
    #[case::typical("500", Decimal::new(50000, 2))]
    #[case::maximum("50000.00", Decimal::new(5_000_000, 2))]
    fn test_deposit_adds_amount(#[case] amount: &str, #[case] expected: Decimal) {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "1111");

        let outcome = bank.deposit(&deposit_request(account, "1111", amount), yes).unwrap();

        let change = outcome.committed().unwrap();
        assert_eq!(change.previous, Decimal::ZERO);
        assert_eq!(change.current, expected);
        assert_eq!(balance(&bank, account), expected);
    }

    #[rstest]
    #[case::zero("0")]
    #[case::over_limit("50000.01")]
    #[case::bad_format("12.345")]
    fn test_deposit_rejects_invalid_amounts(#[case] amount: &str) {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "1111");

        let result = bank.deposit(&deposit_request(account, "1111", amount), yes);

        assert!(matches!(result, Err(BankError::Validation { .. })));
        assert_eq!(balance(&bank, account), Decimal::ZERO);
    }

    #[test]
    fn test_deposit_wrong_pin() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "1111");

        let result = bank.deposit(&deposit_request(account, "2222", "10"), yes);

        assert_eq!(result, Err(BankError::authentication_failed(account)));
        assert_eq!(balance(&bank, account), Decimal::ZERO);
    }

    #[test]
    fn test_deposit_unknown_account() {
        let (_dir, bank) = bank();
        let missing = AccountNumber::new(1234567).unwrap();

        let result = bank.deposit(&deposit_request(missing, "1111", "10"), yes);

        assert_eq!(result, Err(BankError::account_not_found(missing)));
    }

    #[test]
    fn test_deposit_out_of_range_account_number() {
        let (_dir, bank) = bank();
        let request = DepositRequest {
            account_number: "123".to_string(),
            pin: "1111".to_string(),
            amount: "10".to_string(),
        };

        let result = bank.deposit(&request, yes);

        assert!(matches!(result, Err(BankError::Validation { .. })));
    }

    #[test]
    fn test_deposit_cancelled_changes_nothing() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "1111");

        let outcome = bank.deposit(&deposit_request(account, "1111", "10"), no).unwrap();

        assert!(outcome.is_cancelled());
        assert_eq!(balance(&bank, account), Decimal::ZERO);
    }

    #[test]
    fn test_deposit_confirmation_sees_new_balance() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "1111");
        fund(&bank, account, Decimal::new(1000, 2));

        let mut seen = None;
        bank.deposit(&deposit_request(account, "1111", "5.50"), |pending| {
            seen = Some(pending.clone());
            true
        })
        .unwrap();

        assert_eq!(
            seen,
            Some(PendingOperation::Deposit {
                account,
                name: "Test Holder".to_string(),
                amount: Decimal::new(550, 2),
                new_balance: Decimal::new(1550, 2),
            })
        );
    }

    #[rstest]
    #[case::part("30.00", Decimal::new(7000, 2))]
    #[case::all("100", Decimal::ZERO)]
    fn test_withdraw_subtracts_amount(#[case] amount: &str, #[case] expected: Decimal) {
        let (_dir, bank) = bank();
        let account = open(&bank, "Current", "2222");
        fund(&bank, account, Decimal::new(10000, 2));

        let change = bank
            .withdraw(&withdraw_request(account, "2222", amount), yes)
            .unwrap()
            .committed()
            .unwrap();

        assert_eq!(change.current, expected);
        assert_eq!(balance(&bank, account), expected);
    }

    #[test]
    fn test_withdraw_more_than_balance() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Current", "2222");
        fund(&bank, account, Decimal::new(10000, 2));

        let result = bank.withdraw(&withdraw_request(account, "2222", "200"), yes);

        assert_eq!(
            result,
            Err(BankError::insufficient_funds(
                account,
                Decimal::new(10000, 2),
                Decimal::new(20000, 2)
            ))
        );
        assert_eq!(balance(&bank, account), Decimal::new(10000, 2));
    }

    #[test]
    fn test_withdraw_from_empty_account_rejected_before_amount() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Current", "2222");

        let result = bank.withdraw(&withdraw_request(account, "2222", "not money"), yes);

        assert!(matches!(result, Err(BankError::InsufficientFunds { .. })));
    }

    #[test]
    fn test_withdraw_zero_amount() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Current", "2222");
        fund(&bank, account, Decimal::new(10000, 2));

        let result = bank.withdraw(&withdraw_request(account, "2222", "0.00"), yes);

        assert!(matches!(result, Err(BankError::Validation { .. })));
    }

    #[rstest]
    #[case::savings_to_current("Savings", "Current", Decimal::new(200, 2))]
    #[case::current_to_savings("Current", "Savings", Decimal::new(300, 2))]
    #[case::savings_to_savings("Savings", "Savings", Decimal::ZERO)]
    #[case::current_to_current("Current", "Current", Decimal::ZERO)]
    fn test_transfer_applies_fee_to_sender(
        #[case] sender_type: &str,
        #[case] receiver_type: &str,
        #[case] fee: Decimal,
    ) {
        let (_dir, bank) = bank();
        let sender = open(&bank, sender_type, "1111");
        let receiver = open(&bank, receiver_type, "4444");
        fund(&bank, sender, Decimal::new(100000, 2));
        fund(&bank, receiver, Decimal::new(50000, 2));

        let receipt = bank
            .transfer(&transfer_request(sender, receiver, "100.00"), yes)
            .unwrap()
            .committed()
            .unwrap();

        assert_eq!(receipt.fee, fee);
        let sender_expected = Decimal::new(90000, 2) - fee;
        assert_eq!(receipt.sender_balance, sender_expected);
        assert_eq!(receipt.receiver_balance, Decimal::new(60000, 2));
        assert_eq!(balance(&bank, sender), sender_expected);
        assert_eq!(balance(&bank, receiver), Decimal::new(60000, 2));
    }

    #[test]
    fn test_transfer_to_same_account() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "1111");
        fund(&bank, account, Decimal::new(10000, 2));

        let result = bank.transfer(&transfer_request(account, account, "10"), yes);

        assert_eq!(result, Err(BankError::same_account(account)));
        assert_eq!(balance(&bank, account), Decimal::new(10000, 2));
    }

    #[test]
    fn test_transfer_to_missing_receiver() {
        let (_dir, bank) = bank();
        let sender = open(&bank, "Savings", "1111");
        fund(&bank, sender, Decimal::new(10000, 2));
        let missing = AccountNumber::new(1000000).unwrap();

        let result = bank.transfer(&transfer_request(sender, missing, "10"), yes);

        assert_eq!(result, Err(BankError::account_not_found(missing)));
        assert_eq!(balance(&bank, sender), Decimal::new(10000, 2));
    }

    #[test]
    fn test_transfer_fee_counts_toward_shortfall() {
        let (_dir, bank) = bank();
        let sender = open(&bank, "Current", "1111");
        let receiver = open(&bank, "Savings", "4444");
        fund(&bank, sender, Decimal::new(10000, 2));

        // 100.00 + 3% fee = 103.00 > 100.00
        let result = bank.transfer(&transfer_request(sender, receiver, "100"), yes);

        assert_eq!(
            result,
            Err(BankError::insufficient_funds(
                sender,
                Decimal::new(10000, 2),
                Decimal::new(10300, 2)
            ))
        );
        assert_eq!(balance(&bank, sender), Decimal::new(10000, 2));
        assert_eq!(balance(&bank, receiver), Decimal::ZERO);
    }

    /// Overwrite the balance line of a fresh record with an arbitrary literal
    fn set_raw_balance(bank: &Bank<AccountRepository>, account: AccountNumber, raw: &str) {
        let path = bank.store().record_path(account);
        let text = std::fs::read_to_string(&path).unwrap();
        let text = text.replace("Initial Deposit: 0.00", &format!("Current Balance: {}", raw));
        std::fs::write(&path, text).unwrap();
    }

    #[rstest]
    #[case::current_to_savings("Current", "Savings")]
    #[case::savings_to_current("Savings", "Current")]
    #[case::same_type("Savings", "Savings")]
    fn test_transfer_of_largest_decimal_is_refused(
        #[case] sender_type: &str,
        #[case] receiver_type: &str,
    ) {
        let (_dir, bank) = bank();
        let sender = open(&bank, sender_type, "1111");
        let receiver = open(&bank, receiver_type, "4444");
        fund(&bank, sender, Decimal::new(10000, 2));

        let result = bank.transfer(
            &transfer_request(sender, receiver, "79228162514264337593543950335"),
            yes,
        );

        assert!(matches!(
            result,
            Err(BankError::InsufficientFunds { account, .. }) if account == sender
        ));
        assert_eq!(balance(&bank, sender), Decimal::new(10000, 2));
        assert_eq!(balance(&bank, receiver), Decimal::ZERO);
    }

    #[test]
    fn test_transfer_to_full_receiver_is_refused() {
        let (_dir, bank) = bank();
        let sender = open(&bank, "Savings", "1111");
        let receiver = open(&bank, "Savings", "4444");
        fund(&bank, sender, Decimal::new(10000, 2));
        set_raw_balance(&bank, receiver, "79228162514264337593543950335");

        let result = bank.transfer(&transfer_request(sender, receiver, "50"), yes);

        assert_eq!(
            result,
            Err(BankError::balance_overflow(receiver, Decimal::new(5000, 2)))
        );
        assert_eq!(balance(&bank, sender), Decimal::new(10000, 2));
        assert_eq!(balance(&bank, receiver), Decimal::MAX);
    }

    #[test]
    fn test_deposit_into_full_account_is_refused() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Current", "1111");
        set_raw_balance(&bank, account, "79228162514264337593543950335");

        let result = bank.deposit(&deposit_request(account, "1111", "1"), yes);

        assert_eq!(
            result,
            Err(BankError::balance_overflow(account, Decimal::new(100, 2)))
        );
        assert_eq!(balance(&bank, account), Decimal::MAX);
    }

    #[test]
    fn test_transfer_cancelled() {
        let (_dir, bank) = bank();
        let sender = open(&bank, "Savings", "1111");
        let receiver = open(&bank, "Current", "4444");
        fund(&bank, sender, Decimal::new(10000, 2));

        let outcome = bank
            .transfer(&transfer_request(sender, receiver, "10"), no)
            .unwrap();

        assert!(outcome.is_cancelled());
        assert_eq!(balance(&bank, sender), Decimal::new(10000, 2));
        assert_eq!(balance(&bank, receiver), Decimal::ZERO);
    }

    fn failing_bank() -> (TempDir, Bank<FailingStore>, AccountNumber, AccountNumber) {
        let dir = TempDir::new().unwrap();
        let store = FailingStore {
            inner: AccountRepository::open(dir.path()).unwrap(),
            fail_updates: RefCell::new(HashSet::new()),
            fail_after_first: RefCell::new(HashSet::new()),
        };
        let bank = Bank::new(store, IdentifierPolicy::default());
        let sender = open(&bank, "Savings", "1111");
        let receiver = open(&bank, "Savings", "4444");
        fund(&bank, sender, Decimal::new(100000, 2));
        (dir, bank, sender, receiver)
    }

    #[test]
    fn test_transfer_restores_sender_when_credit_fails() {
        let (_dir, bank, sender, receiver) = failing_bank();
        bank.store().fail_updates.borrow_mut().insert(receiver);

        let result = bank.transfer(&transfer_request(sender, receiver, "100"), yes);

        assert!(matches!(result, Err(BankError::StorageError { .. })));
        assert_eq!(balance(&bank, sender), Decimal::new(100000, 2));
        assert_eq!(balance(&bank, receiver), Decimal::ZERO);
    }

    #[test]
    fn test_transfer_reports_incomplete_when_restore_fails() {
        let (_dir, bank, sender, receiver) = failing_bank();
        bank.store().fail_updates.borrow_mut().insert(receiver);
        bank.store().fail_after_first.borrow_mut().insert(sender);

        let result = bank.transfer(&transfer_request(sender, receiver, "100"), yes);

        assert_eq!(
            result,
            Err(BankError::TransferIncomplete {
                sender,
                receiver,
                debited: Decimal::new(10000, 2),
            })
        );
        assert_eq!(balance(&bank, sender), Decimal::new(90000, 2));
        assert_eq!(balance(&bank, receiver), Decimal::ZERO);
    }

    fn delete_request(account: AccountNumber, last4: &str, pin: &str) -> DeleteRequest {
        DeleteRequest {
            account_number: account.to_string(),
            identifier_last4: last4.to_string(),
            pin: pin.to_string(),
        }
    }

    #[test]
    fn test_delete_account() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "5678");

        let deleted = bank
            .delete_account(&delete_request(account, "7890", "5678"), yes)
            .unwrap()
            .committed()
            .unwrap();

        assert_eq!(deleted.account_number, account);
        assert!(matches!(
            bank.store().read(account),
            Err(BankError::AccountNotFound { .. })
        ));
        assert_eq!(
            bank.delete_account(&delete_request(account, "7890", "5678"), yes),
            Err(BankError::account_not_found(account))
        );
    }

    #[rstest]
    #[case::wrong_last4("7891", "5678")]
    #[case::wrong_pin("7890", "5679")]
    fn test_delete_requires_both_credentials(#[case] last4: &str, #[case] pin: &str) {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "5678");

        let result = bank.delete_account(&delete_request(account, last4, pin), yes);

        assert_eq!(result, Err(BankError::authentication_failed(account)));
        assert!(bank.store().read(account).is_ok());
    }

    #[test]
    fn test_delete_with_hand_edited_identifier() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "5678");
        let path = bank.store().record_path(account);
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace("ID: 1234567890", "ID: 123456é789")).unwrap();

        let wrong = bank.delete_account(&delete_request(account, "6789", "5678"), yes);
        assert_eq!(wrong, Err(BankError::authentication_failed(account)));

        let deleted = bank
            .delete_account(&delete_request(account, "é789", "5678"), yes)
            .unwrap();
        assert!(!deleted.is_cancelled());
        assert!(!bank.store().exists(account));
    }

    #[test]
    fn test_delete_cancelled_keeps_account() {
        let (_dir, bank) = bank();
        let account = open(&bank, "Savings", "5678");

        let outcome = bank
            .delete_account(&delete_request(account, "7890", "5678"), no)
            .unwrap();

        assert!(outcome.is_cancelled());
        assert!(bank.store().read(account).is_ok());
    }
}
