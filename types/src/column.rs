//! Column definitions

use crate::OptionValue;
use std::fmt;

// =============================================================================
// Column Types
// =============================================================================

/// Semantic column type tag, independent of any database's spelling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Char,
    Text,
    Integer,
    BigInteger,
    SmallInteger,
    Float,
    Decimal,
    DateTime,
    Timestamp,
    Time,
    Date,
    Binary,
    Blob,
    Boolean,
    Uuid,
    Json,
    Enum,
    Set,
    /// Any type the model has no dedicated tag for, kept verbatim
    Custom(String),
}

impl ColumnType {
    /// Canonical tag as written in schema scripts
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Char => "char",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::BigInteger => "biginteger",
            Self::SmallInteger => "smallinteger",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Time => "time",
            Self::Date => "date",
            Self::Binary => "binary",
            Self::Blob => "blob",
            Self::Boolean => "boolean",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::Enum => "enum",
            Self::Set => "set",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for ColumnType {
    fn from(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "char" => Self::Char,
            "text" => Self::Text,
            "integer" => Self::Integer,
            "biginteger" => Self::BigInteger,
            "smallinteger" => Self::SmallInteger,
            "float" => Self::Float,
            "decimal" => Self::Decimal,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            "time" => Self::Time,
            "date" => Self::Date,
            "binary" => Self::Binary,
            "blob" => Self::Blob,
            "boolean" => Self::Boolean,
            "uuid" => Self::Uuid,
            "json" => Self::Json,
            "enum" => Self::Enum,
            "set" => Self::Set,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Column
// =============================================================================

/// A table column as produced by introspection.
///
/// `default` distinguishes "no default" (`None`) from "default null"
/// (`Some(OptionValue::Null)`).
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub limit: Option<u32>,
    pub default: Option<OptionValue>,
    pub null: bool,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    /// Insertion-position hint: the column this one follows
    pub after: Option<String>,
    /// `ON UPDATE` expression (e.g. `CURRENT_TIMESTAMP`)
    pub update: Option<String>,
    pub comment: Option<String>,
    /// Allowed values for `enum` / `set` columns
    pub values: Option<Vec<String>>,
    pub collation: Option<String>,
}

impl Column {
    /// Create a new NOT NULL column with no options
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            limit: None,
            default: None,
            null: false,
            precision: None,
            scale: None,
            after: None,
            update: None,
            comment: None,
            values: None,
            collation: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    #[must_use]
    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn after(mut self, column: impl Into<String>) -> Self {
        self.after = Some(column.into());
        self
    }

    #[must_use]
    pub fn update(mut self, expression: impl Into<String>) -> Self {
        self.update = Some(expression.into());
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }
}

// =============================================================================
// Column Options
// =============================================================================

/// The closed set of column options a schema script can carry, in render order.
///
/// Each variant maps to exactly one typed field of [`Column`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnOption {
    Limit,
    Default,
    Null,
    Precision,
    Scale,
    After,
    Update,
    Comment,
    Values,
    Collation,
}

impl ColumnOption {
    /// Every option, in the fixed order they are rendered
    pub const ALL: [ColumnOption; 10] = [
        Self::Limit,
        Self::Default,
        Self::Null,
        Self::Precision,
        Self::Scale,
        Self::After,
        Self::Update,
        Self::Comment,
        Self::Values,
        Self::Collation,
    ];

    /// Key used for this option in an options map
    pub const fn key(self) -> &'static str {
        match self {
            Self::Limit => "length",
            Self::Default => "default",
            Self::Null => "null",
            Self::Precision => "precision",
            Self::Scale => "scale",
            Self::After => "after",
            Self::Update => "update",
            Self::Comment => "comment",
            Self::Values => "values",
            Self::Collation => "collation",
        }
    }

    /// Look up an option by its map key. `limit` is accepted as an alias of `length`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "limit" => Some(Self::Limit),
            _ => Self::ALL.into_iter().find(|option| option.key() == key),
        }
    }

    /// Read this option's value from a column; `None` when unset
    pub fn read(self, column: &Column) -> Option<OptionValue> {
        match self {
            Self::Limit => column.limit.map(OptionValue::from),
            Self::Default => column.default.clone(),
            Self::Null => Some(OptionValue::Bool(column.null)),
            Self::Precision => column.precision.map(OptionValue::from),
            Self::Scale => column.scale.map(OptionValue::from),
            Self::After => column.after.clone().map(OptionValue::Str),
            Self::Update => column.update.clone().map(OptionValue::Str),
            Self::Comment => column.comment.clone().map(OptionValue::Str),
            Self::Values => column.values.clone().map(OptionValue::List),
            Self::Collation => column.collation.clone().map(OptionValue::Str),
        }
    }

    /// Store a value into the matching column field.
    ///
    /// Returns the value back when its shape does not fit the field.
    pub fn write(self, column: &mut Column, value: OptionValue) -> Result<(), OptionValue> {
        match (self, value) {
            (Self::Limit, OptionValue::Int(n)) => column.limit = Some(to_u32(n)?),
            (Self::Precision, OptionValue::Int(n)) => column.precision = Some(to_u32(n)?),
            (Self::Scale, OptionValue::Int(n)) => column.scale = Some(to_u32(n)?),
            (Self::Default, OptionValue::List(items)) => return Err(OptionValue::List(items)),
            (Self::Default, value) => column.default = Some(value),
            (Self::Null, OptionValue::Bool(b)) => column.null = b,
            (Self::After, OptionValue::Str(s)) => column.after = Some(s),
            (Self::Update, OptionValue::Str(s)) => column.update = Some(s),
            (Self::Comment, OptionValue::Str(s)) => column.comment = Some(s),
            (Self::Values, OptionValue::List(items)) => column.values = Some(items),
            (Self::Collation, OptionValue::Str(s)) => column.collation = Some(s),
            (_, value) => return Err(value),
        }
        Ok(())
    }
}

fn to_u32(n: i64) -> Result<u32, OptionValue> {
    u32::try_from(n).map_err(|_| OptionValue::Int(n))
}

impl fmt::Display for ColumnOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
