//! Database adapter capability
//!
//! The dump and load workflows only talk to a database through
//! [`SchemaAdapter`]; [`connect`] picks the implementation named by an
//! environment's `adapter` setting.

use crate::config::Environment;
use crate::script::ParseError;
use std::path::{Path, PathBuf};

/// A database connection that can snapshot and rebuild its schema.
pub trait SchemaAdapter {
    /// Adapter name as written in configuration
    fn name(&self) -> &str;

    /// Render the current schema as a schema script.
    ///
    /// Returns `None` when the database has no user tables.
    fn schema_dump(&mut self) -> Result<Option<String>, AdapterError>;

    /// Destroy every user table and rebuild the schema from the script at `path`.
    fn schema_load(&mut self, path: &Path) -> Result<(), AdapterError>;
}

impl<T: SchemaAdapter + ?Sized> SchemaAdapter for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn schema_dump(&mut self) -> Result<Option<String>, AdapterError> {
        (**self).schema_dump()
    }

    fn schema_load(&mut self, path: &Path) -> Result<(), AdapterError> {
        (**self).schema_load(path)
    }
}

/// Adapter errors
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("unsupported adapter '{0}'")]
    Unsupported(String),

    /// Driver support was compiled out
    #[error("{adapter} support is not enabled; rebuild with the '{feature}' feature")]
    MissingDriver {
        adapter: &'static str,
        feature: &'static str,
    },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Read(PathBuf, #[source] std::io::Error),

    #[error("invalid schema script: {0}")]
    Script(#[from] ParseError),
}

/// Open the adapter configured for `env`.
pub fn connect(env: &Environment) -> Result<Box<dyn SchemaAdapter>, AdapterError> {
    match env.adapter.as_str() {
        #[cfg(feature = "rusqlite")]
        "sqlite" => Ok(Box::new(crate::sqlite::SqliteAdapter::open(&env.name)?)),

        #[cfg(not(feature = "rusqlite"))]
        "sqlite" => Err(AdapterError::MissingDriver {
            adapter: "SQLite",
            feature: "rusqlite",
        }),

        other => Err(AdapterError::Unsupported(other.into())),
    }
}
