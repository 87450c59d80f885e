//! `schema:load` workflow

use super::{Prompt, Target, WorkflowError};
use crate::adapter::{AdapterError, SchemaAdapter};
use crate::config::Environment;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No schema file; the database was not touched
    Missing { path: PathBuf },
    /// The destroy confirmation was declined
    Aborted,
    Loaded { elapsed: Duration },
}

impl LoadOutcome {
    pub const MISSING_MESSAGE: &'static str = "Schema file missing. Nothing to load.";
    pub const ABORTED_MESSAGE: &'static str = "Aborting.";
}

/// Confirmation asked before destroying `database`
pub fn destroy_question(database: &str) -> String {
    format!("Hey! You must be pretty damn sure that you want to destroy '{database}'. Are you sure?")
}

/// Rebuild the target database from its schema file.
///
/// Unless `destroy` is set, the user must confirm (default no). The adapter
/// is only opened once the file exists and the load is confirmed.
pub fn run<A, F>(
    target: &Target,
    destroy: bool,
    open: F,
    prompt: &mut dyn Prompt,
) -> Result<LoadOutcome, WorkflowError>
where
    A: SchemaAdapter,
    F: FnOnce(&Environment) -> Result<A, AdapterError>,
{
    if !target.schema_file.is_file() {
        tracing::info!(path = %target.schema_file.display(), "schema file missing");
        return Ok(LoadOutcome::Missing {
            path: target.schema_file.clone(),
        });
    }

    if !destroy && !prompt.confirm(&destroy_question(&target.env.name), false)? {
        return Ok(LoadOutcome::Aborted);
    }

    let mut adapter = open(&target.env).map_err(WorkflowError::Execution)?;

    let start = Instant::now();
    adapter
        .schema_load(&target.schema_file)
        .map_err(WorkflowError::Execution)?;
    let elapsed = start.elapsed();

    tracing::info!(environment = %target.environment, ?elapsed, "schema loaded");
    Ok(LoadOutcome::Loaded { elapsed })
}
