//! Schema script writer

use super::default_index_name;
use crate::codegen;
use std::fmt::Write;
use strata_types::Table;

/// Leading comment of every generated script
pub const HEADER: &str = "-- strata schema dump\n-- Replay with `strata schema:load`.\n";

/// Render a complete schema script for `tables`.
///
/// Tables are emitted in the given order, each as a `create()` block.
/// Foreign keys follow in separate `update()` blocks so every referenced
/// table already exists when they are replayed.
pub fn render_schema(tables: &[Table]) -> String {
    let mut code = String::from(HEADER);

    for table in tables {
        write_create_block(&mut code, table);
    }

    for table in tables.iter().filter(|t| !t.foreign_keys.is_empty()) {
        code.push('\n');
        let _ = writeln!(code, "table({})", codegen::quote(&table.name));
        for fk in &table.foreign_keys {
            let _ = writeln!(code, "    ->{}", codegen::foreign_key(fk));
        }
        code.push_str("    ->update();\n");
    }

    code
}

fn write_create_block(code: &mut String, table: &Table) {
    let has_primary = table.primary_index().is_some();

    code.push('\n');
    let _ = writeln!(
        code,
        "table({}, {})",
        codegen::quote(&table.name),
        codegen::table_options(table)
    );

    for column in &table.columns {
        if has_primary && codegen::is_single_primary_key(table, column) {
            continue;
        }
        let _ = writeln!(code, "    ->addColumn({})", codegen::add_column_arguments(column));
    }

    for index in table.secondary_indexes() {
        let name = index
            .name
            .clone()
            .unwrap_or_else(|| default_index_name(&table.name, index));
        let _ = writeln!(code, "    ->addIndex({})", codegen::index(index, &name));
    }

    code.push_str("    ->create();\n");
}
