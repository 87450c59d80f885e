//! Option values shared by table and column options

/// A scalar or array value attached to a table or column option.
///
/// Values are typed: a numeric-looking string such as `"10"` stays a
/// [`OptionValue::Str`] and is rendered quoted.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    /// Explicit SQL `NULL` (e.g. `DEFAULT NULL`)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String literal, whatever it contains
    Str(String),
    /// Ordered list of strings
    List(Vec<String>),
    /// Raw SQL expression, e.g. `CURRENT_TIMESTAMP`. Never quoted by a database.
    Expr(String),
}

impl OptionValue {
    /// Returns `true` for [`OptionValue::Null`]
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<S: Into<String>> FromIterator<S> for OptionValue {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}
