//! `schema:load` command
//!
//! Destroys the configured database and rebuilds it from its schema script.

use std::path::Path;
use strata_migrations::workflow::{self, LoadOutcome, Target};
use strata_migrations::{Config, adapter};

use crate::error::CliError;
use crate::output;
use crate::prompt::TerminalPrompt;

/// Run the load command
pub fn run(
    config: &Config,
    environment: Option<&str>,
    path: Option<&Path>,
    destroy: bool,
) -> Result<(), CliError> {
    let target = Target::resolve(config, environment, path)?;
    super::report_target(&target);

    match workflow::load::run(&target, destroy, adapter::connect, &mut TerminalPrompt)? {
        LoadOutcome::Missing { path } => {
            println!("{}", output::warning(LoadOutcome::MISSING_MESSAGE));
            println!("{}", output::muted(&format!("  expected {}", path.display())));
        }
        LoadOutcome::Aborted => println!("{}", LoadOutcome::ABORTED_MESSAGE),
        LoadOutcome::Loaded { elapsed } => {
            println!("{}", output::heading(&format!("loaded {}", target.schema_file.display())));
            println!();
            println!("{}", output::elapsed(elapsed));
        }
    }
    Ok(())
}
