//! `schema:dump` command
//!
//! Writes the configured database's schema to its schema script.

use std::path::Path;
use strata_migrations::workflow::{self, DumpOutcome, Target};
use strata_migrations::{Config, adapter};

use crate::error::CliError;
use crate::output;
use crate::prompt::TerminalPrompt;

/// Run the dump command
pub fn run(config: &Config, environment: Option<&str>, path: Option<&Path>) -> Result<(), CliError> {
    let target = Target::resolve(config, environment, path)?;
    super::report_target(&target);

    match workflow::dump::run(&target, adapter::connect, &mut TerminalPrompt)? {
        DumpOutcome::Empty => println!("{}", output::warning(DumpOutcome::EMPTY_MESSAGE)),
        DumpOutcome::Written { path, elapsed } => {
            println!("{}", output::setting("writing", path.display()));
            println!();
            println!("{}", output::elapsed(elapsed));
        }
    }
    Ok(())
}
