//! Interactive confirmation via `inquire`

use inquire::Confirm;
use std::io::{self, IsTerminal};
use strata_migrations::{Prompt, WorkflowError};

/// Asks on the terminal; answers with the default when stdin is not a terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, WorkflowError> {
        if !io::stdin().is_terminal() {
            tracing::debug!(question = message, default, "stdin is not a terminal, using default answer");
            return Ok(default);
        }

        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(|e| WorkflowError::Prompt(format!("Prompt cancelled: {e}")))
    }
}
