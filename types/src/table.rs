//! Table definitions

use crate::{Column, ForeignKey, Index, OptionValue};
use indexmap::IndexMap;

/// Table-level options, kept in insertion order.
///
/// Recognized keys are `id` (a bool, or the name of a custom primary key
/// column) and `primary_key` (a list of column names). Any other key is
/// carried through untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableOptions(IndexMap<String, OptionValue>);

impl TableOptions {
    pub const ID: &'static str = "id";
    pub const PRIMARY_KEY: &'static str = "primary_key";

    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an option. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate options in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `id` option, if set
    #[inline]
    pub fn id(&self) -> Option<&OptionValue> {
        self.get(Self::ID)
    }

    /// Column names listed by the `primary_key` option
    pub fn primary_key(&self) -> &[String] {
        match self.get(Self::PRIMARY_KEY) {
            Some(OptionValue::List(columns)) => columns.as_slice(),
            _ => &[],
        }
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for TableOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A table and everything it owns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub options: TableOptions,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Find an index by name
    pub fn find_index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name.as_deref() == Some(name))
    }

    /// The `PRIMARY` index, if the table has a primary key
    pub fn primary_index(&self) -> Option<&Index> {
        self.indexes.iter().find(|i| i.is_primary())
    }

    /// Indexes other than `PRIMARY`
    pub fn secondary_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter().filter(|i| !i.is_primary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_keep_insertion_order() {
        let mut options = TableOptions::new();
        options.insert("engine", "InnoDB");
        options.insert("id", false);
        options.insert("comment", "users");
        options.insert("engine", "MyISAM");

        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["engine", "id", "comment"]);
        assert_eq!(options.get("engine"), Some(&OptionValue::Str("MyISAM".into())));
    }

    #[test]
    fn primary_key_option_defaults_to_empty() {
        let table = Table::new("t");
        assert!(table.options.primary_key().is_empty());

        let table = table.option("primary_key", ["a", "b"].into_iter().collect::<OptionValue>());
        assert_eq!(table.options.primary_key(), ["a", "b"]);
    }

    #[test]
    fn primary_index_lookup() {
        let table = Table::new("users")
            .index(Index::primary(["id"]))
            .index(Index::new(["email"]).named("users_email").unique());

        assert_eq!(table.primary_index().map(|i| i.columns.clone()), Some(vec!["id".into()]));
        assert_eq!(table.secondary_indexes().count(), 1);
        assert!(table.find_index("users_email").is_some());
    }
}
