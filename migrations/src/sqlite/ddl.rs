//! SQLite DDL for rebuilding a schema from model tables

use super::types::{declared_type, render_default};
use crate::script::{default_index_name, implicit_id_column};
use strata_types::{Column, ColumnType, Index, Table};

/// Quote an identifier with backticks
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn ident_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote_ident(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Statements that create every table, then every secondary index
pub fn schema_statements(tables: &[Table]) -> Vec<String> {
    let mut statements: Vec<String> = tables.iter().map(create_table).collect();

    for table in tables {
        for index in table.secondary_indexes() {
            let name = index
                .name
                .clone()
                .unwrap_or_else(|| default_index_name(&table.name, index));
            statements.push(create_index(&table.name, index, &name));
        }
    }

    statements
}

/// `CREATE TABLE` for a table, including its primary and foreign keys.
///
/// The implicit id column is added as `INTEGER PRIMARY KEY AUTOINCREMENT`
/// unless the table already declares a column of that name, which then
/// becomes the primary key.
pub fn create_table(table: &Table) -> String {
    let primary_key = table.options.primary_key();
    let implicit = implicit_id_column(table).filter(|_| primary_key.is_empty());

    let mut lines = Vec::new();

    if let Some(id) = implicit
        && table.find_column(id).is_none()
    {
        lines.push(format!(
            "{} INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL",
            quote_ident(id)
        ));
    }

    for column in &table.columns {
        lines.push(column_definition(column, implicit == Some(column.name.as_str())));
    }

    if !primary_key.is_empty() {
        lines.push(format!("PRIMARY KEY ({})", ident_list(primary_key)));
    }

    for fk in &table.foreign_keys {
        lines.push(format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            ident_list(&fk.columns),
            quote_ident(&fk.referenced_table),
            ident_list(&fk.referenced_columns)
        ));
    }

    format!(
        "CREATE TABLE {} (\n\t{}\n)",
        quote_ident(&table.name),
        lines.join(",\n\t")
    )
}

fn column_definition(column: &Column, primary: bool) -> String {
    let mut sql = quote_ident(&column.name);

    let sql_type = declared_type(column);
    if !sql_type.is_empty() {
        sql.push(' ');
        sql.push_str(&sql_type);
    }

    if primary {
        sql.push_str(" PRIMARY KEY");
        if column.column_type == ColumnType::Integer {
            sql.push_str(" AUTOINCREMENT");
        }
    }
    if !column.null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&render_default(default));
    }
    if let Some(collation) = &column.collation {
        sql.push_str(" COLLATE ");
        sql.push_str(collation);
    }

    if column.after.is_some() || column.update.is_some() || column.comment.is_some() {
        tracing::debug!(column = %column.name, "SQLite ignores after/update/comment column options");
    }

    sql
}

/// `CREATE [UNIQUE] INDEX` for a secondary index
pub fn create_index(table: &str, index: &Index, name: &str) -> String {
    if index.fulltext || index.limit.is_some() {
        tracing::warn!(index = name, "SQLite has no fulltext or prefix-length indexes; creating a plain index");
    }

    format!(
        "CREATE {}INDEX {} ON {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        quote_ident(name),
        quote_ident(table),
        ident_list(&index.columns)
    )
}
