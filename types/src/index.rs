//! Index definitions

/// Reserved index name marking a table's primary key
pub const PRIMARY_INDEX: &str = "PRIMARY";

/// An index over an ordered list of columns.
///
/// Column order is significant and is preserved exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Index {
    pub columns: Vec<String>,
    pub name: Option<String>,
    pub unique: bool,
    pub fulltext: bool,
    /// Prefix length limit; only positive values are meaningful
    pub limit: Option<u32>,
}

impl Index {
    /// Create a plain, unnamed index
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            name: None,
            unique: false,
            fulltext: false,
            limit: None,
        }
    }

    /// Create the `PRIMARY` index over the given key columns
    #[must_use]
    pub fn primary<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self::new(columns).named(PRIMARY_INDEX).unique()
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn fulltext(mut self) -> Self {
        self.fulltext = true;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether this is the reserved primary key index
    #[inline]
    pub fn is_primary(&self) -> bool {
        self.name.as_deref() == Some(PRIMARY_INDEX)
    }
}
