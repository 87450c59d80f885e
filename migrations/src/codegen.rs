//! Schema code generation
//!
//! Renders schema model values as the argument lists a schema script passes to
//! `table(..)`, `addColumn(..)`, `addIndex(..)` and `addForeignKey(..)`.
//!
//! Output is deterministic: the same model always renders to the same bytes,
//! so re-dumping an unchanged database produces no diff. Every value goes
//! through [`format_value`], the one formatting contract shared by table and
//! column options.

use strata_types::{Column, ColumnOption, ForeignKey, Index, OptionValue, Table};

/// Options emitted for a table without a primary key. No other option is
/// rendered for such a table.
pub const NO_PRIMARY_KEY_OPTIONS: &str = "array('id' => false)";

// =============================================================================
// Literals
// =============================================================================

/// Render a single-quoted string literal, escaping `\` and `'`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if matches!(c, '\\' | '\'') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Render an ordered list of quoted strings as `array('a', 'b')`.
pub fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<String> = items.iter().map(|s| quote(s.as_ref())).collect();
    format!("array({})", items.join(", "))
}

/// Format an option value: numbers unquoted, booleans as `true`/`false`,
/// lists via [`quoted_list`], expressions as `literal('..')`, everything else
/// as a quoted string.
pub fn format_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Null => "null".to_string(),
        OptionValue::Bool(true) => "true".to_string(),
        OptionValue::Bool(false) => "false".to_string(),
        OptionValue::Int(n) => n.to_string(),
        // Debug keeps the fractional part (`1.0`), so floats never re-read as ints
        OptionValue::Float(f) if f.is_finite() => format!("{f:?}"),
        // inf and NaN have no literal form
        OptionValue::Float(f) => quote(&f.to_string()),
        OptionValue::Str(s) => quote(s),
        OptionValue::List(items) => quoted_list(items),
        OptionValue::Expr(sql) => format!("literal({})", quote(sql)),
    }
}

fn option_pair(key: &str, value: &OptionValue) -> String {
    format!("{}=>{}", quote(key), format_value(value))
}

// =============================================================================
// Tables
// =============================================================================

/// Whether `column` is the table's sole implicit primary key.
///
/// Rules apply in order:
/// 1. a `primary_key` option listing `"id"` means no column is implicit
/// 2. a column named `"id"` on a table without an `id` option is implicit
/// 3. a column named by the `id` option is implicit (`id => true` names `"id"`)
/// 4. otherwise not
pub fn is_single_primary_key(table: &Table, column: &Column) -> bool {
    let options = &table.options;

    if options.primary_key().iter().any(|c| c == "id") {
        return false;
    }

    match options.id() {
        None | Some(OptionValue::Bool(true)) => column.name == "id",
        Some(OptionValue::Str(id)) => *id == column.name,
        Some(_) => false,
    }
}

/// Render the options map passed to `table(..)`.
///
/// Tables without a `PRIMARY` index collapse to [`NO_PRIMARY_KEY_OPTIONS`].
pub fn table_options(table: &Table) -> String {
    if table.primary_index().is_none() {
        return NO_PRIMARY_KEY_OPTIONS.to_string();
    }

    let parts: Vec<String> = table
        .options
        .iter()
        .map(|(key, value)| option_pair(key, value))
        .collect();

    format!("array({})", parts.join(", "))
}

// =============================================================================
// Columns
// =============================================================================

/// Render the options map for `addColumn(..)`, or an empty string when no
/// option applies.
///
/// Options are visited in [`ColumnOption::ALL`] order. Unset and null values
/// are skipped, as is `null => false` (the implicit default).
pub fn column_options(column: &Column) -> String {
    let parts: Vec<String> = ColumnOption::ALL
        .into_iter()
        .filter_map(|option| {
            let value = option.read(column)?;
            if value.is_null() {
                return None;
            }
            if option == ColumnOption::Null && value == OptionValue::Bool(false) {
                return None;
            }
            Some(option_pair(option.key(), &value))
        })
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("array({})", parts.join(","))
    }
}

/// Render the arguments of `addColumn(..)`: name, type and optional options.
pub fn add_column_arguments(column: &Column) -> String {
    let mut args = vec![quote(&column.name), quote(column.column_type.as_str())];

    let options = column_options(column);
    if !options.is_empty() {
        args.push(options);
    }

    args.join(", ")
}

// =============================================================================
// Foreign Keys & Indexes
// =============================================================================

fn column_list(columns: &[String]) -> String {
    match columns {
        [single] => quote(single),
        many => quoted_list(many),
    }
}

/// Render a complete `addForeignKey(..)` invocation.
///
/// Single-column keys use quoted scalars, composite keys ordered lists.
pub fn foreign_key(fk: &ForeignKey) -> String {
    format!(
        "addForeignKey({}, {}, {})",
        column_list(&fk.columns),
        quote(&fk.referenced_table),
        column_list(&fk.referenced_columns)
    )
}

/// Render the arguments of `addIndex(..)` under an explicit name.
///
/// The options map always holds `name`, then `type`, `unique` and `limit`
/// when set, in that order.
pub fn index(index: &Index, name: &str) -> String {
    let mut options = vec![format!("'name' => {}", quote(name))];

    if index.fulltext {
        options.push("'type' => 'fulltext'".to_string());
    }
    if index.unique {
        options.push("'unique' => true".to_string());
    }
    if let Some(limit) = index.limit.filter(|limit| *limit > 0) {
        options.push(format!("'limit' => {limit}"));
    }

    format!("{}, array({})", quoted_list(&index.columns), options.join(", "))
}
