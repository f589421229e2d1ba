use crate::core::config::{BankConfig, DEFAULT_DATA_DIR};
use clap::Parser;
use std::path::PathBuf;

/// Interactive bank account manager backed by flat files
#[derive(Parser, Debug)]
#[command(name = "flatfile-bank")]
#[command(about = "Interactive bank account manager backed by flat files", long_about = None)]
pub struct CliArgs {
    /// Directory holding account records and the index
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = DEFAULT_DATA_DIR,
        help = "Directory holding account records and index.txt"
    )]
    pub data_dir: PathBuf,

    /// Minimum length of identification numbers
    #[arg(
        long = "id-min-len",
        value_name = "N",
        default_value_t = 7,
        help = "Minimum number of digits in an identification number"
    )]
    pub id_min_len: usize,

    /// Maximum length of identification numbers
    #[arg(
        long = "id-max-len",
        value_name = "N",
        default_value_t = 12,
        help = "Maximum number of digits in an identification number"
    )]
    pub id_max_len: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log level written to stderr: error, warn, info, debug or trace"
    )]
    pub log_level: tracing::Level,
}

impl CliArgs {
    /// Create a BankConfig from CLI arguments
    ///
    /// Invalid identifier bounds are replaced by the defaults with a warning
    /// (see [`BankConfig::new`]).
    pub fn to_bank_config(&self) -> BankConfig {
        BankConfig::new(self.data_dir.clone(), self.id_min_len, self.id_max_len)
    }
}
