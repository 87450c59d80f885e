//! Schema model types for strata
//!
//! Plain value types describing an introspected relational schema:
//!
//! - [`Table`] - a table with its columns, indexes, foreign keys and options
//! - [`Column`] - a column definition with its [`ColumnType`] and options
//! - [`Index`] - an ordered, optionally unique or fulltext index
//! - [`ForeignKey`] - a (possibly composite) reference to another table
//! - [`OptionValue`] - the scalar/array values carried by table and column options
//!
//! The types carry no behaviour beyond construction and lookup. They are built
//! fresh from introspection results, handed to the code generator, and dropped.

mod column;
mod foreign_key;
mod index;
mod table;
mod value;

pub use column::{Column, ColumnOption, ColumnType};
pub use foreign_key::ForeignKey;
pub use index::{Index, PRIMARY_INDEX};
pub use table::{Table, TableOptions};
pub use value::OptionValue;
