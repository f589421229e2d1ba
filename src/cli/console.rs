//! Interactive console
//!
//! Menu dispatch and per-operation dialogues. All input goes through a
//! [`Prompter`]; all account logic goes through the [`Bank`]. Operation
//! failures are printed and the menu is shown again; only running out of input
//! (or a broken terminal) ends the session.

use crate::cli::prompt::Prompter;
use crate::core::validators::{
    validate_account_type, validate_money_format, validate_name, validate_pin,
};
use crate::core::{AccountRepository, Bank};
use crate::types::{
    AccountNumber, AccountType, BankError, DeleteRequest, DepositRequest, Outcome,
    PendingOperation, TransferRequest, WithdrawRequest,
};
use rust_decimal::Decimal;
use std::io::{self, ErrorKind};
use std::str::FromStr;
use tracing::{debug, info};

/// Entries of the main menu, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Create,
    Delete,
    Deposit,
    Withdraw,
    Remittance,
    List,
    RebuildIndex,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 8] = [
        MenuChoice::Create,
        MenuChoice::Delete,
        MenuChoice::Deposit,
        MenuChoice::Withdraw,
        MenuChoice::Remittance,
        MenuChoice::List,
        MenuChoice::RebuildIndex,
        MenuChoice::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuChoice::Create => "Create New Bank Account",
            MenuChoice::Delete => "Delete Bank Account",
            MenuChoice::Deposit => "Deposit Money",
            MenuChoice::Withdraw => "Withdraw Money",
            MenuChoice::Remittance => "Remittance",
            MenuChoice::List => "List Accounts",
            MenuChoice::RebuildIndex => "Rebuild Account Index",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Parse a 1-based menu number
    pub fn from_input(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }
}

/// Field of a new-account draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Identifier,
    AccountType,
    Pin,
}

/// Details collected for a new account, not yet written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountDraft {
    pub name: String,
    pub identifier: String,
    pub account_type: String,
    pub pin: String,
}

/// Account creation dialogue
///
/// `Collecting → Reviewing → (Editing → Reviewing)* → Confirmed | Cancelled`
#[derive(Debug, Clone, PartialEq)]
pub enum CreationState {
    Collecting,
    Reviewing(AccountDraft),
    Editing(AccountDraft, DraftField),
    Confirmed(AccountDraft),
    Cancelled,
}

fn is_account_number(s: &str) -> bool {
    AccountNumber::from_str(s).is_ok()
}

fn is_last4(s: &str) -> bool {
    (1..=4).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

/// Describe an operation awaiting confirmation
pub fn render_pending(pending: &PendingOperation) -> String {
    match pending {
        PendingOperation::Deposit {
            account,
            name,
            amount,
            new_balance,
        } => format!(
            "Deposit {:.2} into account {} ({}). New balance: {:.2}",
            amount, account, name, new_balance
        ),
        PendingOperation::Withdrawal {
            account,
            name,
            amount,
            new_balance,
        } => format!(
            "Withdraw {:.2} from account {} ({}). New balance: {:.2}",
            amount, account, name, new_balance
        ),
        PendingOperation::Transfer {
            sender,
            sender_type,
            receiver,
            receiver_name,
            receiver_type,
            amount,
            fee,
            total,
        } => format!(
            "Transfer {:.2} from account {} ({}) to account {} ({}, {}).\nFee: {:.2}. Total deducted: {:.2}",
            amount, sender, sender_type, receiver, receiver_name, receiver_type, fee, total
        ),
        PendingOperation::Deletion {
            account,
            name,
            balance,
        } => format!(
            "Delete account {} ({}) with balance {:.2}. This cannot be undone.",
            account, name, balance
        ),
    }
}

/// Show the pending operation and ask for confirmation
///
/// Operations take an infallible confirmation callback; an I/O failure is
/// parked in `failure` and treated as a refusal.
fn confirm_pending<P: Prompter>(
    prompter: &mut P,
    pending: &PendingOperation,
    failure: &mut Option<io::Error>,
) -> bool {
    let answer = prompter
        .say(&render_pending(pending))
        .and_then(|_| prompter.confirm("Proceed?"));
    match answer {
        Ok(confirmed) => confirmed,
        Err(e) => {
            *failure = Some(e);
            false
        }
    }
}

/// Interactive session over a flat-file bank
pub struct Console<P: Prompter> {
    bank: Bank<AccountRepository>,
    prompter: P,
}

impl<P: Prompter> Console<P> {
    pub fn new(bank: Bank<AccountRepository>, prompter: P) -> Self {
        Console { bank, prompter }
    }

    /// Give back the prompter, e.g. to inspect captured output
    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Run the menu loop until the user exits or input ends
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the terminal fails.
    pub fn run(&mut self) -> io::Result<()> {
        match self.menu_loop() {
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                info!("Input closed, ending session");
                Ok(())
            }
            other => other,
        }
    }

    fn menu_loop(&mut self) -> io::Result<()> {
        loop {
            self.print_header()?;
            let choice = self.prompter.prompt_validated(
                "Enter your choice: ",
                &|s| MenuChoice::from_input(s).is_some(),
                "Invalid choice. Please try again.",
            )?;
            let Some(choice) = MenuChoice::from_input(&choice) else {
                continue;
            };
            debug!(?choice, "Menu selection");

            match choice {
                MenuChoice::Create => self.create_account()?,
                MenuChoice::Delete => self.delete_account()?,
                MenuChoice::Deposit => self.deposit()?,
                MenuChoice::Withdraw => self.withdraw()?,
                MenuChoice::Remittance => self.remittance()?,
                MenuChoice::List => self.list_accounts()?,
                MenuChoice::RebuildIndex => self.rebuild_index()?,
                MenuChoice::Exit => {
                    self.prompter.say("Exiting the program.")?;
                    return Ok(());
                }
            }
        }
    }

    fn print_header(&mut self) -> io::Result<()> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let loaded = match self.bank.store().index().count() {
            Ok(count) => count.to_string(),
            Err(_) => "unknown".to_string(),
        };

        self.prompter.say("")?;
        self.prompter.say("Bank Account Management System")?;
        self.prompter.say("--------------------------------")?;
        self.prompter.say(&format!("Session started: {}", now))?;
        self.prompter.say(&format!("Loaded accounts: {}", loaded))?;
        self.prompter.say("")?;
        self.prompter.say("Select :")?;
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            self.prompter.say(&format!("{}. {}", i + 1, choice.label()))?;
        }
        Ok(())
    }

    fn report(&mut self, error: &BankError) -> io::Result<()> {
        self.prompter.say(&format!("Error: {}", error))
    }

    fn ask_account_number(&mut self, label: &str) -> io::Result<String> {
        self.prompter.prompt_validated(
            label,
            &is_account_number,
            &format!(
                "Invalid account number! Enter a number between {} and {}.",
                AccountNumber::MIN,
                AccountNumber::MAX
            ),
        )
    }

    fn ask_pin(&mut self, label: &str) -> io::Result<String> {
        self.prompter.prompt_validated(
            label,
            &validate_pin,
            "Invalid PIN! Please enter exactly 4 digits.",
        )
    }

    fn ask_amount(&mut self, label: &str) -> io::Result<String> {
        self.prompter.prompt_validated(
            label,
            &validate_money_format,
            "Invalid amount! Use digits with at most 2 decimal places.",
        )
    }

    fn ask_field(&mut self, field: DraftField) -> io::Result<String> {
        match field {
            DraftField::Name => self.prompter.prompt_validated(
                "Enter name (letters and spaces only): ",
                &validate_name,
                "Invalid name! Please use only letters and spaces.",
            ),
            DraftField::Identifier => {
                let policy = self.bank.identifier_policy();
                self.prompter.prompt_validated(
                    &format!("Enter Identification Number ({}): ", policy.describe()),
                    &|s| policy.validate(s),
                    &format!("Invalid ID! Please enter {}.", policy.describe()),
                )
            }
            DraftField::AccountType => {
                let raw = self.prompter.prompt_validated(
                    "Type of Account (Savings or Current): ",
                    &validate_account_type,
                    "Invalid account type! Please enter 'Savings' or 'Current'.",
                )?;
                Ok(AccountType::from_str(&raw)
                    .map(|t| t.to_string())
                    .unwrap_or(raw))
            }
            DraftField::Pin => self.ask_pin("Create 4-digit PIN: "),
        }
    }

    fn review(&mut self, draft: AccountDraft) -> io::Result<CreationState> {
        self.prompter.say("")?;
        self.prompter.say("Please review your details:")?;
        self.prompter.say(&format!("1. Name: {}", draft.name))?;
        self.prompter.say(&format!("2. ID: {}", draft.identifier))?;
        self.prompter
            .say(&format!("3. Account Type: {}", draft.account_type))?;
        self.prompter.say(&format!("4. PIN: {}", "*".repeat(draft.pin.len())))?;

        let answer = self.prompter.prompt_validated(
            "Enter 'c' to confirm, 1-4 to edit a field, or 'x' to cancel: ",
            &|s| matches!(s.to_ascii_lowercase().as_str(), "c" | "x" | "1" | "2" | "3" | "4"),
            "Invalid choice. Please try again.",
        )?;

        Ok(match answer.to_ascii_lowercase().as_str() {
            "c" => CreationState::Confirmed(draft),
            "1" => CreationState::Editing(draft, DraftField::Name),
            "2" => CreationState::Editing(draft, DraftField::Identifier),
            "3" => CreationState::Editing(draft, DraftField::AccountType),
            "4" => CreationState::Editing(draft, DraftField::Pin),
            _ => CreationState::Cancelled,
        })
    }

    fn create_account(&mut self) -> io::Result<()> {
        let mut state = CreationState::Collecting;
        loop {
            state = match state {
                CreationState::Collecting => {
                    let draft = AccountDraft {
                        name: self.ask_field(DraftField::Name)?,
                        identifier: self.ask_field(DraftField::Identifier)?,
                        account_type: self.ask_field(DraftField::AccountType)?,
                        pin: self.ask_field(DraftField::Pin)?,
                    };
                    CreationState::Reviewing(draft)
                }
                CreationState::Reviewing(draft) => self.review(draft)?,
                CreationState::Editing(mut draft, field) => {
                    let value = self.ask_field(field)?;
                    match field {
                        DraftField::Name => draft.name = value,
                        DraftField::Identifier => draft.identifier = value,
                        DraftField::AccountType => draft.account_type = value,
                        DraftField::Pin => draft.pin = value,
                    }
                    CreationState::Reviewing(draft)
                }
                CreationState::Confirmed(draft) => {
                    match self.bank.open_account(
                        &draft.name,
                        &draft.identifier,
                        &draft.account_type,
                        &draft.pin,
                    ) {
                        Ok(created) => {
                            self.prompter.say(&format!(
                                "Your Bank Account Number is: {}",
                                created.account_number
                            ))?;
                            if !created.indexed {
                                self.prompter.say(
                                    "Warning: the account was created but could not be added to the index. Use 'Rebuild Account Index' to repair it.",
                                )?;
                            }
                            self.prompter
                                .say("Created your new bank account successfully!")?;
                        }
                        Err(e) => self.report(&e)?,
                    }
                    return Ok(());
                }
                CreationState::Cancelled => {
                    self.prompter.say("Account creation cancelled.")?;
                    return Ok(());
                }
            };
        }
    }

    /// Ask for account and PIN, failing fast before any amount is requested
    fn ask_credentials(&mut self) -> io::Result<Option<(String, String, Decimal)>> {
        let number = self.ask_account_number("Enter your Bank Account Number: ")?;
        let pin = self.ask_pin("Enter your 4-digit PIN: ")?;
        match self.bank.authenticate(&number, &pin) {
            Ok(account) => {
                self.prompter.say(&format!(
                    "Welcome, {}. Current balance: {:.2}",
                    account.name, account.balance
                ))?;
                Ok(Some((number, pin, account.balance)))
            }
            Err(e) => {
                self.report(&e)?;
                Ok(None)
            }
        }
    }

    fn deposit(&mut self) -> io::Result<()> {
        let Some((account_number, pin, _)) = self.ask_credentials()? else {
            return Ok(());
        };

        loop {
            let request = DepositRequest {
                account_number: account_number.clone(),
                pin: pin.clone(),
                amount: self.ask_amount("Enter amount to deposit (max 50000.00): ")?,
            };

            let mut failure = None;
            let prompter = &mut self.prompter;
            let result = self
                .bank
                .deposit(&request, |pending| confirm_pending(prompter, pending, &mut failure));
            if let Some(e) = failure {
                return Err(e);
            }

            match result {
                Ok(Outcome::Committed(change)) => {
                    self.prompter.say(&format!(
                        "Deposit successful. New balance: {:.2}",
                        change.current
                    ))?;
                }
                Ok(Outcome::Cancelled) => self.prompter.say("Deposit cancelled.")?,
                Err(e) if e.is_validation() => {
                    self.report(&e)?;
                    continue;
                }
                Err(e) => self.report(&e)?,
            }
            return Ok(());
        }
    }

    fn withdraw(&mut self) -> io::Result<()> {
        let Some((account_number, pin, balance)) = self.ask_credentials()? else {
            return Ok(());
        };
        if balance <= Decimal::ZERO {
            self.prompter
                .say("Insufficient funds: your balance is 0.00.")?;
            return Ok(());
        }

        loop {
            let request = WithdrawRequest {
                account_number: account_number.clone(),
                pin: pin.clone(),
                amount: self.ask_amount("Enter amount to withdraw: ")?,
            };

            let mut failure = None;
            let prompter = &mut self.prompter;
            let result = self
                .bank
                .withdraw(&request, |pending| confirm_pending(prompter, pending, &mut failure));
            if let Some(e) = failure {
                return Err(e);
            }

            match result {
                Ok(Outcome::Committed(change)) => {
                    self.prompter.say(&format!(
                        "Withdrawal successful. New balance: {:.2}",
                        change.current
                    ))?;
                }
                Ok(Outcome::Cancelled) => self.prompter.say("Withdrawal cancelled.")?,
                Err(e) if e.is_validation() => {
                    self.report(&e)?;
                    continue;
                }
                Err(e) => self.report(&e)?,
            }
            return Ok(());
        }
    }

    fn remittance(&mut self) -> io::Result<()> {
        let Some((sender, pin, _)) = self.ask_credentials()? else {
            return Ok(());
        };
        let receiver = self.ask_account_number("Enter the receiver's Bank Account Number: ")?;

        loop {
            let request = TransferRequest {
                sender: sender.clone(),
                pin: pin.clone(),
                receiver: receiver.clone(),
                amount: self.ask_amount("Enter amount to transfer: ")?,
            };

            let mut failure = None;
            let prompter = &mut self.prompter;
            let result = self
                .bank
                .transfer(&request, |pending| confirm_pending(prompter, pending, &mut failure));
            if let Some(e) = failure {
                return Err(e);
            }

            match result {
                Ok(Outcome::Committed(receipt)) => {
                    self.prompter.say(&format!(
                        "Transfer successful. Fee charged: {:.2}. Your new balance: {:.2}",
                        receipt.fee, receipt.sender_balance
                    ))?;
                }
                Ok(Outcome::Cancelled) => self.prompter.say("Transfer cancelled.")?,
                Err(e) if e.is_validation() => {
                    self.report(&e)?;
                    continue;
                }
                Err(e) => self.report(&e)?,
            }
            return Ok(());
        }
    }

    fn delete_account(&mut self) -> io::Result<()> {
        let account_number = self.ask_account_number("Enter the Bank Account Number to delete: ")?;
        let identifier_last4 = self.prompter.prompt_validated(
            "Enter the last 4 digits of your Identification Number: ",
            &is_last4,
            "Invalid input! Please enter up to 4 digits.",
        )?;
        let pin = self.ask_pin("Enter your 4-digit PIN: ")?;
        let request = DeleteRequest {
            account_number,
            identifier_last4,
            pin,
        };

        let mut failure = None;
        let prompter = &mut self.prompter;
        let result = self
            .bank
            .delete_account(&request, |pending| confirm_pending(prompter, pending, &mut failure));
        if let Some(e) = failure {
            return Err(e);
        }

        match result {
            Ok(Outcome::Committed(account)) => self.prompter.say(&format!(
                "Account {} has been deleted.",
                account.account_number
            )),
            Ok(Outcome::Cancelled) => self.prompter.say("Deletion cancelled."),
            Err(e) => self.report(&e),
        }
    }

    fn list_accounts(&mut self) -> io::Result<()> {
        let entries = match self.bank.store().list() {
            Ok(entries) => entries,
            Err(e) => return self.report(&e),
        };

        if entries.is_empty() {
            return self.prompter.say("No accounts found.");
        }

        self.prompter.say(&format!(
            "{:<12} {:<30} {:<14} {}",
            "Account", "Name", "ID", "Type"
        ))?;
        for entry in &entries {
            self.prompter.say(&format!(
                "{:<12} {:<30} {:<14} {}",
                entry.account_number.to_string(),
                entry.name,
                entry.identifier,
                entry.account_type
            ))?;
        }
        self.prompter
            .say(&format!("{} account(s) listed.", entries.len()))
    }

    fn rebuild_index(&mut self) -> io::Result<()> {
        match self.bank.store().rebuild_index() {
            Ok(count) => self
                .prompter
                .say(&format!("Index rebuilt with {} account(s).", count)),
            Err(e) => self.report(&e),
        }
    }
}
