//! Strata Migrations - schema dump and load engine
//!
//! This crate provides:
//! - [`codegen`]: deterministic rendering of schema model values as the
//!   argument lists of a schema script
//! - [`script`]: writing and parsing complete schema scripts
//! - [`adapter`]: the database capability the workflows rely on
//! - [`sqlite`]: SQLite introspection and DDL (adapter behind the `rusqlite` feature)
//! - [`config`]: `strata.toml` loading and migration path resolution
//! - [`workflow`]: the `schema:dump` and `schema:load` flows
//!
//! # Example
//!
//! ```ignore
//! use strata_migrations::{Config, adapter, workflow::{self, AcceptDefaults, Target}};
//!
//! let config = Config::load()?;
//! let target = Target::resolve(&config, Some("development"), None)?;
//! let outcome = workflow::dump::run(&target, adapter::connect, &mut AcceptDefaults)?;
//! ```

pub mod adapter;
pub mod codegen;
pub mod config;
pub mod script;
pub mod sqlite;
pub mod workflow;

pub use adapter::{AdapterError, SchemaAdapter};
pub use config::{Config, ConfigError, Environment};
pub use script::{ParseError, parse_schema, render_schema};
pub use workflow::{DumpOutcome, LoadOutcome, Prompt, Target, WorkflowError};

#[cfg(feature = "rusqlite")]
pub use sqlite::SqliteAdapter;
