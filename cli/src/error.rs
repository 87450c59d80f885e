//! Error types for the CLI

use strata_migrations::{ConfigError, WorkflowError};
use thiserror::Error;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dump or load failure
    #[error("{0}")]
    Workflow(WorkflowError),
}

impl From<WorkflowError> for CliError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Config(e) => Self::Config(e),
            other => Self::Workflow(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_failures_keep_their_category() {
        let err = CliError::from(WorkflowError::Config(ConfigError::NoMigrationPaths));
        assert!(matches!(err, CliError::Config(ConfigError::NoMigrationPaths)));
        assert!(err.to_string().starts_with("Configuration error: "));

        let err = CliError::from(WorkflowError::Prompt("cancelled".into()));
        assert!(matches!(err, CliError::Workflow(WorkflowError::Prompt(_))));
    }
}
