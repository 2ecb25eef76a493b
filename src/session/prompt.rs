//! Line-oriented user input

use std::io::{BufRead, IsTerminal};

use crate::{Error, Result};

/// Reads one line of input in response to a prompt
pub trait Prompter {
    /// Show `prompt` and read a line, trimmed
    ///
    /// Returns `Ok(None)` once input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns error if reading from the input fails
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive terminal input
///
/// Uses `dialoguer` on a TTY and plain line reads when stdin is piped.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if std::io::stdin().is_terminal() {
            let line: String = dialoguer::Input::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(|e| Error::Input(e.to_string()))?;
            return Ok(Some(line.trim().to_string()));
        }

        println!("{prompt}: ");
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
