//! Project configuration
//!
//! Handles loading `strata.toml`:
//!
//! ```toml
//! default_environment = "development"
//!
//! [paths]
//! migrations = ["db/migrations", "modules/*/migrations"]
//!
//! [environments.development]
//! adapter = "sqlite"
//! name = "./dev.db"
//!
//! [environments.staging]
//! adapter = "sqlite"
//! name = "./staging.db"
//! schema_name = "staging"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "strata.toml";

/// Directory under a migration path that holds schema scripts
pub const SCHEMA_DIR: &str = "schema";

/// Extension of schema script files
pub const SCHEMA_EXTENSION: &str = "strata";

// ============================================================================
// Config
// ============================================================================

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Environment used when none is given on the command line
    #[serde(default)]
    pub default_environment: Option<String>,

    #[serde(default)]
    pub paths: Paths,

    /// Named database environments
    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paths {
    /// Migration directories; glob patterns are expanded
    #[serde(default)]
    pub migrations: PathList,
}

/// Path pattern(s)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathList {
    One(String),
    Many(Vec<String>),
}

impl Default for PathList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl PathList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Self::One(s) => std::slice::from_ref(s).iter().map(String::as_str),
            Self::Many(v) => v.iter().map(String::as_str),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Connection settings for one environment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Environment {
    /// Adapter name, e.g. `sqlite`
    pub adapter: String,
    /// Database name; a file path for SQLite
    pub name: String,
    /// Prefix for the schema script file name
    #[serde(default)]
    pub schema_name: Option<String>,
}

// ============================================================================
// Config implementation
// ============================================================================

impl Config {
    /// Load from default config file
    pub fn load() -> Result<Self, Error> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from specific path
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;

        toml::from_str(&content).map_err(|e| Error::Parse(path.into(), e))
    }

    /// Configured migration path patterns, unexpanded
    pub fn migration_paths(&self) -> impl Iterator<Item = &str> {
        self.paths.migrations.iter()
    }

    /// Name of the environment to use when none is given.
    ///
    /// Falls back to the only environment when `default_environment` is unset.
    pub fn default_environment(&self) -> Result<&str, Error> {
        if let Some(name) = &self.default_environment {
            return Ok(name);
        }

        let mut names = self.environments.keys();
        match (names.next(), names.next()) {
            (Some(only), None) => Ok(only),
            _ => Err(Error::NoDefaultEnvironment),
        }
    }

    /// Look up an environment by name
    pub fn environment(&self, name: &str) -> Result<&Environment, Error> {
        self.environments
            .get(name)
            .ok_or_else(|| Error::UnknownEnvironment(name.into()))
    }

    /// Directory schema scripts live under.
    ///
    /// An explicit path wins. Otherwise the configured patterns are expanded
    /// and the first match is used.
    pub fn resolve_migration_path(&self, path: Option<&Path>) -> Result<PathBuf, Error> {
        if let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(path.to_path_buf());
        }

        if self.paths.migrations.is_empty() {
            return Err(Error::NoMigrationPaths);
        }

        let mut matched = Vec::new();
        for pattern in self.migration_paths() {
            let paths = glob::glob(pattern).map_err(|e| Error::Glob(pattern.into(), e))?;
            matched.extend(paths.filter_map(Result::ok));
        }

        if matched.len() > 1 {
            tracing::debug!(count = matched.len(), "several migration paths matched, using the first");
        }

        matched
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoMatchingPaths(self.migration_paths().collect::<Vec<_>>().join(", ")))
    }
}

/// Schema script location for an environment inside a migration path.
///
/// `<dir>/schema/<schema_name>_schema.strata`, or `<dir>/schema/schema.strata`
/// when the environment has no schema name.
pub fn schema_file(migration_path: &Path, env: &Environment) -> PathBuf {
    let file = match env.schema_name.as_deref().filter(|s| !s.is_empty()) {
        Some(prefix) => format!("{prefix}_schema.{SCHEMA_EXTENSION}"),
        None => format!("schema.{SCHEMA_EXTENSION}"),
    };
    migration_path.join(SCHEMA_DIR).join(file)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("no migration paths set in your configuration file")]
    NoMigrationPaths,

    #[error(
        "no directories matched the migration path patterns ({0}); create a migration directory manually"
    )]
    NoMatchingPaths(String),

    #[error("invalid glob '{0}': {1}")]
    Glob(String, #[source] glob::PatternError),

    #[error("environment '{0}' is not defined in your configuration file")]
    UnknownEnvironment(String),

    #[error("no default environment set and more than one environment defined")]
    NoDefaultEnvironment,
}

pub type ConfigError = Error;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_env(schema_name: Option<&str>) -> Environment {
        Environment {
            adapter: "sqlite".into(),
            name: "dev.db".into(),
            schema_name: schema_name.map(Into::into),
        }
    }

    #[test]
    fn parses_environments() {
        let cfg: Config = toml::from_str(
            r#"
            default_environment = "dev"
            [paths]
            migrations = "db/migrations"
            [environments.dev]
            adapter = "sqlite"
            name = "dev.db"
            [environments.prod]
            adapter = "sqlite"
            name = "prod.db"
            schema_name = "prod"
        "#,
        )
        .unwrap();

        assert_eq!(cfg.default_environment().unwrap(), "dev");
        assert_eq!(cfg.migration_paths().collect::<Vec<_>>(), ["db/migrations"]);
        assert_eq!(cfg.environment("prod").unwrap().schema_name.as_deref(), Some("prod"));
        assert!(matches!(cfg.environment("qa"), Err(Error::UnknownEnvironment(_))));
    }

    #[test]
    fn single_environment_is_the_default() {
        let cfg: Config = toml::from_str(
            r#"
            [environments.local]
            adapter = "sqlite"
            name = "local.db"
        "#,
        )
        .unwrap();
        assert_eq!(cfg.default_environment().unwrap(), "local");

        let empty = Config::default();
        assert!(matches!(empty.default_environment(), Err(Error::NoDefaultEnvironment)));
    }

    #[test]
    fn schema_file_names() {
        let dir = Path::new("db/migrations");
        assert_eq!(
            schema_file(dir, &sqlite_env(None)),
            Path::new("db/migrations/schema/schema.strata")
        );
        assert_eq!(
            schema_file(dir, &sqlite_env(Some("tenant"))),
            Path::new("db/migrations/schema/tenant_schema.strata")
        );
        assert_eq!(
            schema_file(dir, &sqlite_env(Some(""))),
            Path::new("db/migrations/schema/schema.strata")
        );
    }

    #[test]
    fn explicit_path_wins() {
        let cfg = Config::default();
        let path = cfg.resolve_migration_path(Some(Path::new("elsewhere"))).unwrap();
        assert_eq!(path, Path::new("elsewhere"));
    }

    #[test]
    fn missing_paths_are_errors() {
        let cfg = Config::default();
        assert!(matches!(cfg.resolve_migration_path(None), Err(Error::NoMigrationPaths)));

        let cfg: Config = toml::from_str(
            r#"
            [paths]
            migrations = ["/nonexistent/strata/*/migrations"]
        "#,
        )
        .unwrap();
        assert!(matches!(cfg.resolve_migration_path(None), Err(Error::NoMatchingPaths(_))));
    }

    #[test]
    fn first_glob_match_is_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b/migrations")).unwrap();
        std::fs::create_dir_all(dir.path().join("a/migrations")).unwrap();

        let pattern = dir.path().join("*/migrations");
        let cfg = Config {
            paths: Paths {
                migrations: PathList::One(pattern.to_string_lossy().into_owned()),
            },
            ..Config::default()
        };

        let path = cfg.resolve_migration_path(None).unwrap();
        assert_eq!(path, dir.path().join("a/migrations"));
    }
}
