//! Flat-file bank CLI
//!
//! Interactive console for managing bank accounts stored as one text file per
//! account plus a pipe-delimited index.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --data-dir /srv/bank
//! cargo run -- --id-min-len 12 --id-max-len 12 --log-level info
//! RUST_LOG=flatfile_bank=debug cargo run
//! ```
//!
//! Logs go to stderr so they never interleave with prompts.
//!
//! # Exit Codes
//!
//! - 0: The user chose Exit, or input ended
//! - 1: The data directory could not be opened, or the terminal failed

use flatfile_bank::cli::{self, Console, StdioPrompter};
use flatfile_bank::core::{AccountRepository, Bank};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.to_bank_config();
    let repository = match AccountRepository::open(&config.data_dir) {
        Ok(repository) => repository,
        Err(e) => {
            error!(data_dir = %config.data_dir.display(), "Cannot open data directory: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    info!(data_dir = %config.data_dir.display(), "Data directory ready");

    let bank = Bank::new(repository, config.identifier_policy);
    let stdin = std::io::stdin();
    let prompter = StdioPrompter::new(stdin.lock(), std::io::stdout());

    let mut console = Console::new(bank, prompter);
    if let Err(e) = console.run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
