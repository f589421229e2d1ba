//! Interactive input capability
//!
//! The console never reads stdin directly. It asks a [`Prompter`] for values
//! that satisfy a predicate, and the prompter keeps asking until one does. This
//! keeps every retry loop in one place and lets tests drive the console with
//! scripted input.

use std::io::{self, BufRead, ErrorKind, Write};

/// Source of user input and sink for user-facing messages
pub trait Prompter {
    /// Show `label` and read one line, without its line terminator
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` when input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<String>;

    /// Show a message on its own line
    fn say(&mut self, message: &str) -> io::Result<()>;

    /// Ask until the answer satisfies `is_valid`, showing `error` after each rejection
    fn prompt_validated(
        &mut self,
        label: &str,
        is_valid: &dyn Fn(&str) -> bool,
        error: &str,
    ) -> io::Result<String> {
        loop {
            let answer = self.prompt(label)?;
            if is_valid(&answer) {
                return Ok(answer);
            }
            self.say(error)?;
        }
    }

    /// Ask a yes/no question until the answer is one of y, yes, n, no (any case)
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.prompt_validated(
            &format!("{} (y/n): ", question),
            &|s| {
                matches!(
                    s.to_ascii_lowercase().as_str(),
                    "y" | "yes" | "n" | "no"
                )
            },
            "Please answer 'y' or 'n'.",
        )?;
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

/// Prompter over any line-oriented reader and writer
///
/// Used with stdin/stdout by the binary and with in-memory buffers in tests.
pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        StdioPrompter { input, output }
    }

    /// Give back the writer, e.g. to inspect captured output
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}
