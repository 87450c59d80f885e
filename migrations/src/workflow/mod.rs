//! Dump and load workflows
//!
//! Both workflows resolve a [`Target`] from configuration, ask questions
//! through a [`Prompt`] and reach the database only through a
//! [`SchemaAdapter`](crate::adapter::SchemaAdapter) opened on demand. Nothing
//! here prints; callers report the returned outcomes.

pub mod dump;
pub mod load;

pub use dump::DumpOutcome;
pub use load::LoadOutcome;

use crate::adapter::AdapterError;
use crate::config::{self, Config, ConfigError, Environment};
use std::path::{Path, PathBuf};

/// Environment and schema file a workflow operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Environment name
    pub environment: String,
    /// Whether the environment came from the configured default
    pub defaulted: bool,
    pub env: Environment,
    pub schema_file: PathBuf,
}

impl Target {
    /// Resolve the environment and schema file.
    ///
    /// `path` overrides the configured migration paths.
    pub fn resolve(
        config: &Config,
        environment: Option<&str>,
        path: Option<&Path>,
    ) -> Result<Self, WorkflowError> {
        let migration_path = config.resolve_migration_path(path)?;

        let (environment, defaulted) = match environment {
            Some(name) => (name.to_string(), false),
            None => (config.default_environment()?.to_string(), true),
        };
        let env = config.environment(&environment)?.clone();
        let schema_file = config::schema_file(&migration_path, &env);

        tracing::debug!(
            environment = %environment,
            adapter = %env.adapter,
            schema_file = %schema_file.display(),
            "resolved target"
        );

        Ok(Self {
            environment,
            defaulted,
            env,
            schema_file,
        })
    }

    /// Directory holding the schema file
    pub fn schema_dir(&self) -> &Path {
        self.schema_file.parent().unwrap_or(Path::new("."))
    }
}

/// Yes/no questions asked during a workflow
pub trait Prompt {
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, WorkflowError>;
}

/// Answers every question with its default
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptDefaults;

impl Prompt for AcceptDefaults {
    fn confirm(&mut self, _message: &str, default: bool) -> Result<bool, WorkflowError> {
        Ok(default)
    }
}

/// Workflow errors
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("migration directory \"{}\" does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("failed to create directory \"{}\": {}", .0.display(), .1)]
    CreateDirectory(PathBuf, #[source] std::io::Error),

    #[error("the file \"{}\" could not be written to: {}", .0.display(), .1)]
    Write(PathBuf, #[source] std::io::Error),

    #[error("schema dump failed: {0}")]
    Dump(#[source] AdapterError),

    #[error("schema load failed: {0}")]
    Execution(#[source] AdapterError),

    #[error("prompt failed: {0}")]
    Prompt(String),
}
