//! Strata CLI - dump and reload database schemas
//!
//! The `strata` binary snapshots the schema of a configured database into a
//! schema script and rebuilds a database from that script.
//!
//! # Configuration
//!
//! Create a `strata.toml` in your project root:
//!
//! ```toml
//! default_environment = "development"
//!
//! [paths]
//! migrations = "db/migrations"
//!
//! [environments.development]
//! adapter = "sqlite"
//! name = "./dev.db"
//! ```
//!
//! # Commands
//!
//! - `strata schema:dump` - Write `db/migrations/schema/schema.strata`
//! - `strata schema:load` - Destroy the database and rebuild it from that file
//! - `strata schema:load --destroy` - Same, without asking first

pub mod commands;
pub mod error;
pub mod output;
pub mod prompt;

pub use error::CliError;
