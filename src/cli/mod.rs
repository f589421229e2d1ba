// CLI module
// Command-line arguments, prompting and the interactive console

mod args;
pub mod console;
pub mod prompt;

pub use args::CliArgs;
pub use console::Console;
pub use prompt::{Prompter, StdioPrompter};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
