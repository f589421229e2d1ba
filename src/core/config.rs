//! Bank configuration
//!
//! Runtime settings shared by the repository and the operations, usually built
//! from command-line arguments (see [`crate::cli::CliArgs::to_bank_config`]).

use crate::core::validators::IdentifierPolicy;
use std::path::PathBuf;
use tracing::warn;

/// Default storage directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "database";

/// Configuration for a bank session
#[derive(Clone, Debug, PartialEq)]
pub struct BankConfig {
    /// Directory holding account records and the index
    pub data_dir: PathBuf,
    /// Length bounds for identification numbers
    pub identifier_policy: IdentifierPolicy,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            identifier_policy: IdentifierPolicy::default(),
        }
    }
}

impl BankConfig {
    /// Create a new BankConfig with custom values
    ///
    /// Inconsistent identifier bounds (a zero minimum, or a minimum above the
    /// maximum) fall back to the default policy with a warning.
    pub fn new(data_dir: impl Into<PathBuf>, id_min_len: usize, id_max_len: usize) -> Self {
        let identifier_policy = if id_min_len == 0 || id_min_len > id_max_len {
            let default = IdentifierPolicy::default();
            warn!(
                id_min_len,
                id_max_len,
                default_min = default.min_len,
                default_max = default.max_len,
                "Invalid identifier length bounds, using defaults"
            );
            default
        } else {
            IdentifierPolicy {
                min_len: id_min_len,
                max_len: id_max_len,
            }
        };

        Self {
            data_dir: data_dir.into(),
            identifier_policy,
        }
    }
}
