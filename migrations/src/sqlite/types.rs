//! SQLite type and default-value mapping

use strata_types::{Column, ColumnType, OptionValue};

/// A declared SQLite column type split into its model parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub column_type: ColumnType,
    pub limit: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

/// Map a declared type such as `VARCHAR(255)` or `decimal(10, 2)`.
///
/// One size argument is a precision for `DECIMAL` and a limit otherwise; two
/// arguments are always precision and scale. Unknown names become
/// [`ColumnType::Custom`] in lower case.
pub fn parse_declared_type(declared: &str) -> DeclaredType {
    let declared = declared.trim();
    let (base, args) = match declared.split_once('(') {
        Some((base, rest)) => (base.trim(), rest.trim_end().trim_end_matches(')')),
        None => (declared, ""),
    };

    let column_type = match base.to_ascii_uppercase().as_str() {
        "VARCHAR" | "NVARCHAR" | "CHARACTER VARYING" => ColumnType::String,
        "CHAR" | "CHARACTER" | "NCHAR" => ColumnType::Char,
        "TEXT" | "CLOB" => ColumnType::Text,
        "INTEGER" | "INT" => ColumnType::Integer,
        "BIGINT" => ColumnType::BigInteger,
        "SMALLINT" => ColumnType::SmallInteger,
        "FLOAT" | "REAL" | "DOUBLE" | "DOUBLE PRECISION" => ColumnType::Float,
        "DECIMAL" | "NUMERIC" => ColumnType::Decimal,
        "DATETIME" => ColumnType::DateTime,
        "TIMESTAMP" => ColumnType::Timestamp,
        "TIME" => ColumnType::Time,
        "DATE" => ColumnType::Date,
        "BINARY" | "VARBINARY" => ColumnType::Binary,
        "BLOB" => ColumnType::Blob,
        "BOOLEAN" | "BOOL" => ColumnType::Boolean,
        "UUID" => ColumnType::Uuid,
        "JSON" => ColumnType::Json,
        "ENUM" => ColumnType::Enum,
        "SET" => ColumnType::Set,
        _ => ColumnType::Custom(base.to_ascii_lowercase()),
    };

    let sizes: Vec<u32> = args
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .filter_map(|a| a.parse().ok())
        .collect();

    let mut parsed = DeclaredType {
        column_type,
        limit: None,
        precision: None,
        scale: None,
    };

    match sizes.as_slice() {
        [] => {}
        [p] if parsed.column_type == ColumnType::Decimal => parsed.precision = Some(*p),
        [limit] => parsed.limit = Some(*limit),
        [p, s, ..] => {
            parsed.precision = Some(*p);
            parsed.scale = Some(*s);
        }
    }

    parsed
}

/// SQLite spelling of a column's type, with its size arguments
pub fn declared_type(column: &Column) -> String {
    let base = match &column.column_type {
        ColumnType::String => "VARCHAR".to_string(),
        ColumnType::Char => "CHAR".to_string(),
        ColumnType::Text => "TEXT".to_string(),
        ColumnType::Integer => "INTEGER".to_string(),
        ColumnType::BigInteger => "BIGINT".to_string(),
        ColumnType::SmallInteger => "SMALLINT".to_string(),
        ColumnType::Float => "FLOAT".to_string(),
        ColumnType::Decimal => "DECIMAL".to_string(),
        ColumnType::DateTime => "DATETIME".to_string(),
        ColumnType::Timestamp => "TIMESTAMP".to_string(),
        ColumnType::Time => "TIME".to_string(),
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Binary => "BINARY".to_string(),
        ColumnType::Blob => "BLOB".to_string(),
        ColumnType::Boolean => "BOOLEAN".to_string(),
        ColumnType::Uuid => "UUID".to_string(),
        ColumnType::Json => "JSON".to_string(),
        ColumnType::Enum | ColumnType::Set => {
            if column.values.is_some() {
                tracing::warn!(column = %column.name, "SQLite does not store enum/set values");
            }
            column.column_type.as_str().to_ascii_uppercase()
        }
        ColumnType::Custom(name) => name.to_ascii_uppercase(),
    };

    match (column.precision, column.scale, column.limit) {
        (Some(p), Some(s), _) => format!("{base}({p},{s})"),
        (Some(p), None, _) => format!("{base}({p})"),
        (None, _, Some(limit)) => format!("{base}({limit})"),
        (None, _, None) => base,
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// Read the `dflt_value` text SQLite reports for a column.
///
/// Quoted text becomes a string literal and numbers stay numbers. Anything
/// else, including numbers that overflow to infinity, is kept verbatim as
/// [`OptionValue::Expr`].
pub fn parse_default(text: &str) -> OptionValue {
    let text = text.trim();

    if text.eq_ignore_ascii_case("NULL") {
        return OptionValue::Null;
    }
    if text.eq_ignore_ascii_case("TRUE") {
        return OptionValue::Bool(true);
    }
    if text.eq_ignore_ascii_case("FALSE") {
        return OptionValue::Bool(false);
    }
    if let Some(inner) = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .filter(|inner| !inner.replace("''", "").contains('\''))
    {
        return OptionValue::Str(inner.replace("''", "'"));
    }
    if let Ok(n) = text.parse::<i64>() {
        return OptionValue::Int(n);
    }
    let numeric = !text.is_empty()
        && text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if numeric
        && let Ok(f) = text.parse::<f64>()
        && f.is_finite()
    {
        return OptionValue::Float(f);
    }

    OptionValue::Expr(text.to_string())
}

/// SQL text for a column default
pub fn render_default(value: &OptionValue) -> String {
    match value {
        OptionValue::Null => "NULL".to_string(),
        OptionValue::Bool(true) => "TRUE".to_string(),
        OptionValue::Bool(false) => "FALSE".to_string(),
        OptionValue::Int(n) => n.to_string(),
        OptionValue::Float(f) if f.is_finite() => format!("{f:?}"),
        OptionValue::Float(f) => quote_literal(&f.to_string()),
        OptionValue::Str(s) => quote_literal(s),
        OptionValue::List(items) => quote_literal(&items.join(",")),
        OptionValue::Expr(sql) => sql.clone(),
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types() {
        let varchar = parse_declared_type("VARCHAR(255)");
        assert_eq!(varchar.column_type, ColumnType::String);
        assert_eq!(varchar.limit, Some(255));

        let decimal = parse_declared_type("decimal(10, 2)");
        assert_eq!(decimal.column_type, ColumnType::Decimal);
        assert_eq!((decimal.precision, decimal.scale), (Some(10), Some(2)));

        let numeric = parse_declared_type("NUMERIC(8)");
        assert_eq!((numeric.precision, numeric.limit), (Some(8), None));

        assert_eq!(parse_declared_type("int").column_type, ColumnType::Integer);
        assert_eq!(parse_declared_type("REAL").column_type, ColumnType::Float);
        assert_eq!(
            parse_declared_type("GEOMETRY").column_type,
            ColumnType::Custom("geometry".into())
        );
        assert_eq!(parse_declared_type("").column_type, ColumnType::Custom(String::new()));
    }

    #[test]
    fn declared_type_rendering() {
        assert_eq!(declared_type(&Column::new("a", "string").limit(64)), "VARCHAR(64)");
        assert_eq!(declared_type(&Column::new("a", "decimal").precision(10, 2)), "DECIMAL(10,2)");
        assert_eq!(declared_type(&Column::new("a", "biginteger")), "BIGINT");
        assert_eq!(declared_type(&Column::new("a", "geometry")), "GEOMETRY");
    }

    #[test]
    fn rendered_types_read_back() {
        for column in [
            Column::new("a", "string").limit(32),
            Column::new("a", "decimal").precision(12, 4),
            Column::new("a", "char").limit(2),
            Column::new("a", "json"),
        ] {
            let parsed = parse_declared_type(&declared_type(&column));
            assert_eq!(parsed.column_type, column.column_type);
            assert_eq!(parsed.limit, column.limit);
            assert_eq!(parsed.precision, column.precision);
            assert_eq!(parsed.scale, column.scale);
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(parse_default("NULL"), OptionValue::Null);
        assert_eq!(parse_default("'it''s'"), OptionValue::Str("it's".into()));
        assert_eq!(parse_default("-3"), OptionValue::Int(-3));
        assert_eq!(parse_default("1.5"), OptionValue::Float(1.5));
        assert_eq!(parse_default("TRUE"), OptionValue::Bool(true));
        assert_eq!(parse_default("CURRENT_TIMESTAMP"), OptionValue::Expr("CURRENT_TIMESTAMP".into()));
        assert_eq!(parse_default("inf"), OptionValue::Expr("inf".into()));
        assert_eq!(parse_default("'a' || 'b'"), OptionValue::Expr("'a' || 'b'".into()));

        assert_eq!(render_default(&OptionValue::Str("it's".into())), "'it''s'");
        assert_eq!(render_default(&OptionValue::Expr("CURRENT_TIMESTAMP".into())), "CURRENT_TIMESTAMP");
        assert_eq!(render_default(&OptionValue::Expr("(datetime('now'))".into())), "(datetime('now'))");
        assert_eq!(render_default(&OptionValue::Float(2.0)), "2.0");
        assert_eq!(parse_default(&render_default(&OptionValue::Float(2.0))), OptionValue::Float(2.0));
    }

    #[test]
    fn string_defaults_stay_literals() {
        for text in ["(none)", "CURRENT_TIMESTAMP", "1.5"] {
            let value = OptionValue::Str(text.into());
            let rendered = render_default(&value);
            assert!(rendered.starts_with('\''), "{rendered}");
            assert_eq!(parse_default(&rendered), value);
        }
    }

    #[test]
    fn overflowing_numbers_are_expressions() {
        assert_eq!(parse_default("1e999"), OptionValue::Expr("1e999".into()));
        assert_eq!(parse_default("-1e999"), OptionValue::Expr("-1e999".into()));
        assert_eq!(render_default(&OptionValue::Expr("1e999".into())), "1e999");
        assert_eq!(render_default(&OptionValue::Float(f64::INFINITY)), "'inf'");
    }
}
