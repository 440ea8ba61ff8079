//! Overwrite confirmation prompts

use reciter_common::Confirm;
use std::io::{BufRead, Write};

/// Asks on a terminal: prints the prompt and reads one line.
///
/// Only `y`/`Y` confirms; anything else, including end of input, declines.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on stdin/stdout
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    fn confirm(&mut self, prompt: &str) -> std::io::Result<bool> {
        writeln!(self.output, "\nWarning: {}", prompt)?;
        write!(self.output, "Overwrite? [y/N]: ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

/// Confirms every overwrite (`--yes`)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> std::io::Result<bool> {
        tracing::info!("{}; overwriting (--yes)", prompt);
        Ok(true)
    }
}
