//! `schema:dump` workflow

use super::{Prompt, Target, WorkflowError};
use crate::adapter::{AdapterError, SchemaAdapter};
use crate::config::Environment;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Question asked before creating a missing schema directory
pub const CREATE_DIRECTORY_QUESTION: &str = "Create migrations directory?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpOutcome {
    /// The database has no tables; nothing was written
    Empty,
    /// The schema script was written
    Written { path: PathBuf, elapsed: Duration },
}

impl DumpOutcome {
    pub const EMPTY_MESSAGE: &'static str = "Database is empty. Nothing to dump!";
}

/// Dump the target database's schema to its schema file.
///
/// A missing schema directory is created after confirmation (default yes).
/// An existing schema file is overwritten.
pub fn run<A, F>(target: &Target, open: F, prompt: &mut dyn Prompt) -> Result<DumpOutcome, WorkflowError>
where
    A: SchemaAdapter,
    F: FnOnce(&Environment) -> Result<A, AdapterError>,
{
    let dir = target.schema_dir();
    if !dir.exists() && prompt.confirm(CREATE_DIRECTORY_QUESTION, true)? {
        std::fs::create_dir_all(dir)
            .map_err(|e| WorkflowError::CreateDirectory(dir.to_path_buf(), e))?;
        tracing::info!(dir = %dir.display(), "created schema directory");
    }
    if !dir.is_dir() {
        return Err(WorkflowError::MissingDirectory(dir.to_path_buf()));
    }

    let mut adapter = open(&target.env).map_err(WorkflowError::Dump)?;

    let start = Instant::now();
    let dump = adapter.schema_dump().map_err(WorkflowError::Dump)?;
    let elapsed = start.elapsed();

    let Some(dump) = dump.filter(|d| !d.is_empty()) else {
        tracing::info!(environment = %target.environment, "database is empty");
        return Ok(DumpOutcome::Empty);
    };

    let path = target.schema_file.clone();
    std::fs::write(&path, dump).map_err(|e| WorkflowError::Write(path.clone(), e))?;
    tracing::info!(path = %path.display(), ?elapsed, "schema dumped");

    Ok(DumpOutcome::Written { path, elapsed })
}
