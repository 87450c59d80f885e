//! SQLite schema introspection
//!
//! The rusqlite-backed adapter reads catalog rows into the raw structs below;
//! [`build_tables`] turns them into model tables without touching a database.

use super::types::{parse_declared_type, parse_default};
use crate::script::default_index_name;
use std::collections::BTreeMap;
use strata_types::{Column, ColumnType, ForeignKey, Index, OptionValue, Table, TableOptions};

/// Raw column info from `pragma_table_info`
#[derive(Debug, Clone)]
pub struct RawColumn {
    pub cid: i64,
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    /// 1-based position in the primary key, 0 when not part of it
    pub pk: i64,
}

/// Raw index info from `pragma_index_list` and `pragma_index_info`
#[derive(Debug, Clone)]
pub struct RawIndex {
    pub name: String,
    pub unique: bool,
    /// `c` for CREATE INDEX, `u` for UNIQUE, `pk` for PRIMARY KEY
    pub origin: String,
    pub partial: bool,
    /// Indexed columns in order; `None` for expressions
    pub columns: Vec<Option<String>>,
}

/// Raw foreign key row from `pragma_foreign_key_list`
#[derive(Debug, Clone)]
pub struct RawForeignKey {
    pub id: i64,
    pub seq: i64,
    pub table: String,
    pub from: String,
    /// `None` when the key references the parent's primary key implicitly
    pub to: Option<String>,
}

/// Everything read for a single table
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<RawColumn>,
    pub indexes: Vec<RawIndex>,
    pub foreign_keys: Vec<RawForeignKey>,
}

pub mod queries {
    /// User tables, in dump order
    pub const TABLES_QUERY: &str = r"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
          AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
        ORDER BY name
    ";

    /// User tables and views, for dropping before a load
    pub const OBJECTS_QUERY: &str = r"
        SELECT type, name
        FROM sqlite_master
        WHERE type IN ('table', 'view')
          AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
        ORDER BY type DESC, name
    ";

    pub const COLUMNS_QUERY: &str = r#"
        SELECT cid, name, type, "notnull", dflt_value, pk
        FROM pragma_table_info(?1)
        ORDER BY cid
    "#;

    pub const INDEXES_QUERY: &str = r#"
        SELECT name, "unique", origin, partial
        FROM pragma_index_list(?1)
    "#;

    pub const INDEX_COLUMNS_QUERY: &str = r"
        SELECT name
        FROM pragma_index_info(?1)
        ORDER BY seqno
    ";

    pub const FOREIGN_KEYS_QUERY: &str = r#"
        SELECT id, seq, "table", "from", "to"
        FROM pragma_foreign_key_list(?1)
    "#;
}

/// Build model tables, sorted by name.
pub fn build_tables(raw: &[RawTable]) -> Vec<Table> {
    let primary_keys: BTreeMap<&str, Vec<String>> = raw
        .iter()
        .map(|t| (t.name.as_str(), primary_key_columns(t)))
        .collect();

    let mut tables: Vec<Table> = raw.iter().map(|t| build_table(t, &primary_keys)).collect();
    tables.sort_by(|a, b| a.name.cmp(&b.name));
    tables
}

fn primary_key_columns(raw: &RawTable) -> Vec<String> {
    let mut pk: Vec<&RawColumn> = raw.columns.iter().filter(|c| c.pk > 0).collect();
    pk.sort_by_key(|c| c.pk);
    pk.into_iter().map(|c| c.name.clone()).collect()
}

fn build_table(raw: &RawTable, primary_keys: &BTreeMap<&str, Vec<String>>) -> Table {
    let mut table = Table::new(&raw.name);

    let mut columns: Vec<&RawColumn> = raw.columns.iter().collect();
    columns.sort_by_key(|c| c.cid);
    table.columns = columns.into_iter().map(build_column).collect();

    let (options, primary) = key_options(raw, &table);
    table.options = options;
    table.indexes.extend(primary);
    table.indexes.extend(build_indexes(raw));
    table.foreign_keys = build_foreign_keys(raw, primary_keys);

    tracing::debug!(
        table = %table.name,
        columns = table.columns.len(),
        indexes = table.indexes.len(),
        foreign_keys = table.foreign_keys.len(),
        "introspected table"
    );

    table
}

fn build_column(raw: &RawColumn) -> Column {
    let declared = parse_declared_type(&raw.declared_type);

    let mut column = Column::new(&raw.name, declared.column_type);
    column.limit = declared.limit;
    column.precision = declared.precision;
    column.scale = declared.scale;
    column.null = !raw.not_null;
    column.default = raw.default_value.as_deref().map(parse_default);
    column
}

/// `id` / `primary_key` options and the `PRIMARY` index.
///
/// A single `INTEGER` key is the implicit id column, named through the `id`
/// option when it is not `id`. Any other key disables the implicit column
/// and is listed under `primary_key`.
fn key_options(raw: &RawTable, table: &Table) -> (TableOptions, Option<Index>) {
    let pk = primary_key_columns(raw);
    let mut options = TableOptions::new();

    match pk.as_slice() {
        [] => {
            options.insert(TableOptions::ID, false);
            return (options, None);
        }
        [single]
            if table
                .find_column(single)
                .is_some_and(|c| c.column_type == ColumnType::Integer) =>
        {
            if single != "id" {
                options.insert(TableOptions::ID, single.as_str());
            }
        }
        _ => {
            options.insert(TableOptions::ID, false);
            options.insert(TableOptions::PRIMARY_KEY, pk.iter().collect::<OptionValue>());
        }
    }

    (options, Some(Index::primary(pk)))
}

fn build_indexes(raw: &RawTable) -> Vec<Index> {
    let mut indexes = Vec::new();

    for idx in raw.indexes.iter().filter(|i| i.origin != "pk") {
        if idx.partial {
            tracing::warn!(table = %raw.name, index = %idx.name, "skipping partial index");
            continue;
        }
        let Some(columns) = idx.columns.iter().cloned().collect::<Option<Vec<String>>>() else {
            tracing::warn!(table = %raw.name, index = %idx.name, "skipping expression index");
            continue;
        };

        let mut index = Index::new(columns);
        index.unique = idx.unique;
        index.name = Some(if idx.name.starts_with("sqlite_autoindex_") {
            default_index_name(&raw.name, &index)
        } else {
            idx.name.clone()
        });
        indexes.push(index);
    }

    indexes.sort_by(|a, b| a.name.cmp(&b.name));
    indexes
}

fn build_foreign_keys(raw: &RawTable, primary_keys: &BTreeMap<&str, Vec<String>>) -> Vec<ForeignKey> {
    let mut groups: BTreeMap<i64, Vec<&RawForeignKey>> = BTreeMap::new();
    for row in &raw.foreign_keys {
        groups.entry(row.id).or_default().push(row);
    }

    let mut keys: Vec<ForeignKey> = groups
        .into_values()
        .filter_map(|mut rows| {
            rows.sort_by_key(|r| r.seq);
            let referenced_table = rows.first()?.table.clone();
            let columns: Vec<String> = rows.iter().map(|r| r.from.clone()).collect();
            let referenced_columns = match rows.iter().map(|r| r.to.clone()).collect::<Option<Vec<_>>>() {
                Some(to) => to,
                None => primary_keys
                    .get(referenced_table.as_str())
                    .cloned()
                    .unwrap_or_default(),
            };

            let fk = ForeignKey::new(columns, referenced_table, referenced_columns);
            if fk.is_well_formed() {
                Some(fk)
            } else {
                tracing::warn!(table = %raw.name, references = %fk.referenced_table, "skipping unresolvable foreign key");
                None
            }
        })
        .collect();

    keys.sort_by(|a, b| {
        (&a.columns, &a.referenced_table).cmp(&(&b.columns, &b.referenced_table))
    });
    keys
}
