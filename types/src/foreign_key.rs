//! Foreign key definitions

/// A foreign key from local columns to columns of another table.
///
/// The referenced table is held by name only. `columns` and
/// `referenced_columns` pair up positionally; see [`ForeignKey::is_well_formed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}

impl ForeignKey {
    #[must_use]
    pub fn new<L, R>(
        columns: impl IntoIterator<Item = L>,
        referenced_table: impl Into<String>,
        referenced_columns: impl IntoIterator<Item = R>,
    ) -> Self
    where
        L: Into<String>,
        R: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            referenced_table: referenced_table.into(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Both column lists are non-empty and of equal length
    pub fn is_well_formed(&self) -> bool {
        !self.columns.is_empty() && self.columns.len() == self.referenced_columns.len()
    }
}
