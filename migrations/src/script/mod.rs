//! Schema scripts
//!
//! A schema script is the persisted, human-editable projection of a schema:
//!
//! ```text
//! -- strata schema dump
//!
//! table('users', array())
//!     ->addColumn('email', 'string', array('length'=>255))
//!     ->addIndex(array('email'), array('name' => 'users_email', 'unique' => true))
//!     ->create();
//!
//! table('posts')
//!     ->addForeignKey('user_id', 'users', 'id')
//!     ->update();
//! ```
//!
//! [`render_schema`] writes one from a list of tables and [`parse_schema`]
//! reads it back.

mod parser;
mod writer;

pub use parser::{ParseError, parse_add_column_arguments, parse_schema};
pub use writer::{HEADER, render_schema};

use strata_types::{Index, OptionValue, Table};

/// Name the script uses for an index without one: `<table>_<col>_<col>`.
pub fn default_index_name(table: &str, index: &Index) -> String {
    let mut name = table.to_string();
    for column in &index.columns {
        name.push('_');
        name.push_str(column);
    }
    name
}

/// Column a loader creates implicitly for a table's primary key, if any.
///
/// No `id` option (or `id => true`) names `"id"`, a string names a custom
/// column, and `id => false` disables it.
pub fn implicit_id_column(table: &Table) -> Option<&str> {
    match table.options.id() {
        None | Some(OptionValue::Bool(true)) => Some("id"),
        Some(OptionValue::Str(name)) => Some(name),
        Some(_) => None,
    }
}

/// The `PRIMARY` index implied by a table's options.
///
/// A `primary_key` list wins; otherwise the implicit id column is the key.
pub fn implied_primary_index(table: &Table) -> Option<Index> {
    let primary_key = table.options.primary_key();
    if !primary_key.is_empty() {
        return Some(Index::primary(primary_key.iter().cloned()));
    }
    implicit_id_column(table).map(|column| Index::primary([column]))
}
