//! SQLite support
//!
//! Type mapping, DDL generation and introspection are plain functions over
//! the schema model. The rusqlite-backed [`SqliteAdapter`] is only built with
//! the `rusqlite` feature.

pub mod ddl;
pub mod introspect;
pub mod types;

#[cfg(feature = "rusqlite")]
mod adapter;

#[cfg(feature = "rusqlite")]
pub use adapter::SqliteAdapter;
