//! Core business logic module
//!
//! This module contains the account processing components:
//! - `traits` - Storage abstraction used by the operations
//! - `validators` - Pure input predicates and the identifier policy
//! - `fees` - Transfer fee schedule
//! - `repository` - Flat-file account records, index upkeep and number allocation
//! - `bank` - Open, deposit, withdraw, transfer and delete operations
//! - `config` - Runtime configuration

pub mod bank;
pub mod config;
pub mod fees;
pub mod repository;
pub mod traits;
pub mod validators;

pub use bank::Bank;
pub use config::BankConfig;
pub use repository::AccountRepository;
pub use traits::AccountStore;
pub use validators::IdentifierPolicy;
