use super::ddl::{quote_ident, schema_statements};
use super::introspect::{RawColumn, RawForeignKey, RawIndex, RawTable, build_tables, queries};
use crate::adapter::{AdapterError, SchemaAdapter};
use crate::script;
use rusqlite::{Connection, params};
use std::path::Path;

fn query_err(e: rusqlite::Error) -> AdapterError {
    AdapterError::Query(e.to_string())
}

/// Schema adapter over a rusqlite connection
pub struct SqliteAdapter {
    conn: Connection,
}

impl SqliteAdapter {
    /// Open (or create) the database file at `path`
    pub fn open(path: &str) -> Result<Self, AdapterError> {
        let conn = Connection::open(path).map_err(|e| {
            AdapterError::Connection(format!("failed to open SQLite database '{path}': {e}"))
        })?;
        Ok(Self { conn })
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn read_raw_tables(&self) -> Result<Vec<RawTable>, AdapterError> {
        let names: Vec<String> = self
            .conn
            .prepare(queries::TABLES_QUERY)
            .and_then(|mut stmt| {
                stmt.query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(query_err)?;

        names
            .into_iter()
            .map(|name| self.read_raw_table(name))
            .collect()
    }

    fn read_raw_table(&self, name: String) -> Result<RawTable, AdapterError> {
        let columns = self
            .conn
            .prepare(queries::COLUMNS_QUERY)
            .and_then(|mut stmt| {
                stmt.query_map(params![name], |row| {
                    Ok(RawColumn {
                        cid: row.get(0)?,
                        name: row.get(1)?,
                        declared_type: row.get(2)?,
                        not_null: row.get::<_, i64>(3)? != 0,
                        default_value: row.get(4)?,
                        pk: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()
            })
            .map_err(query_err)?;

        let mut indexes: Vec<RawIndex> = self
            .conn
            .prepare(queries::INDEXES_QUERY)
            .and_then(|mut stmt| {
                stmt.query_map(params![name], |row| {
                    Ok(RawIndex {
                        name: row.get(0)?,
                        unique: row.get::<_, i64>(1)? != 0,
                        origin: row.get(2)?,
                        partial: row.get::<_, i64>(3)? != 0,
                        columns: Vec::new(),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()
            })
            .map_err(query_err)?;

        for index in &mut indexes {
            index.columns = self
                .conn
                .prepare(queries::INDEX_COLUMNS_QUERY)
                .and_then(|mut stmt| {
                    stmt.query_map(params![index.name], |row| row.get(0))?
                        .collect::<Result<Vec<Option<String>>, _>>()
                })
                .map_err(query_err)?;
        }

        let foreign_keys = self
            .conn
            .prepare(queries::FOREIGN_KEYS_QUERY)
            .and_then(|mut stmt| {
                stmt.query_map(params![name], |row| {
                    Ok(RawForeignKey {
                        id: row.get(0)?,
                        seq: row.get(1)?,
                        table: row.get(2)?,
                        from: row.get(3)?,
                        to: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()
            })
            .map_err(query_err)?;

        Ok(RawTable {
            name,
            columns,
            indexes,
            foreign_keys,
        })
    }

    /// Drop every user object and run `statements`, all in one transaction
    fn rebuild(&mut self, statements: &[String]) -> Result<(), AdapterError> {
        let tx = self.conn.transaction().map_err(query_err)?;

        let objects: Vec<(String, String)> = tx
            .prepare(queries::OBJECTS_QUERY)
            .and_then(|mut stmt| {
                stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(query_err)?;

        for (kind, name) in &objects {
            let keyword = if kind == "view" { "VIEW" } else { "TABLE" };
            tracing::debug!(object = %name, kind = %kind, "dropping");
            tx.execute_batch(&format!("DROP {keyword} IF EXISTS {}", quote_ident(name)))
                .map_err(query_err)?;
        }

        for statement in statements {
            tx.execute_batch(statement)
                .map_err(|e| AdapterError::Query(format!("{e}\n{statement}")))?;
        }

        tx.commit().map_err(query_err)
    }
}

impl SchemaAdapter for SqliteAdapter {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn schema_dump(&mut self) -> Result<Option<String>, AdapterError> {
        let tables = build_tables(&self.read_raw_tables()?);
        if tables.is_empty() {
            return Ok(None);
        }
        Ok(Some(script::render_schema(&tables)))
    }

    fn schema_load(&mut self, path: &Path) -> Result<(), AdapterError> {
        let source =
            std::fs::read_to_string(path).map_err(|e| AdapterError::Read(path.into(), e))?;
        let tables = script::parse_schema(&source)?;
        let statements = schema_statements(&tables);

        tracing::info!(tables = tables.len(), statements = statements.len(), "rebuilding schema");

        let foreign_keys: bool = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get::<_, i64>(0))
            .map_err(query_err)?
            != 0;
        self.conn
            .execute_batch("PRAGMA foreign_keys = OFF")
            .map_err(query_err)?;

        let rebuilt = self.rebuild(&statements);

        let restore = if foreign_keys {
            "PRAGMA foreign_keys = ON"
        } else {
            "PRAGMA foreign_keys = OFF"
        };
        let restored = self.conn.execute_batch(restore).map_err(query_err);

        rebuilt.and(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(sql: &str) -> SqliteAdapter {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(sql).unwrap();
        SqliteAdapter::from_connection(conn)
    }

    #[test]
    fn empty_database_dumps_nothing() {
        let mut adapter = adapter("");
        assert_eq!(adapter.schema_dump().unwrap(), None);
    }

    #[test]
    fn dump_renders_tables() {
        let mut adapter = adapter(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, email VARCHAR(255) NOT NULL);
             CREATE UNIQUE INDEX users_email ON users (email);",
        );

        let dump = adapter.schema_dump().unwrap().unwrap();
        assert!(dump.contains("table('users', array())"));
        assert!(dump.contains("->addColumn('email', 'string', array('length'=>255))"));
        assert!(dump.contains("->addIndex(array('email'), array('name' => 'users_email', 'unique' => true))"));
        assert!(!dump.contains("addColumn('id'"));
    }

    #[test]
    fn load_replaces_existing_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.strata");
        std::fs::write(
            &path,
            "table('posts', array())\n    ->addColumn('title', 'string', array('length'=>100))\n    ->create();\n",
        )
        .unwrap();

        let mut adapter = adapter(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE legacy (x INTEGER);
             CREATE VIEW legacy_view AS SELECT x FROM legacy;",
        );
        adapter.schema_load(&path).unwrap();

        let names: Vec<String> = adapter
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE name NOT LIKE 'sqlite%' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(names, ["posts"]);

        let fk: i64 = adapter
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn invalid_script_leaves_database_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.strata");
        std::fs::write(&path, "table('posts', array())\n    ->explode()\n    ->create();\n").unwrap();

        let mut adapter = adapter("CREATE TABLE legacy (x INTEGER);");
        let err = adapter.schema_load(&path).unwrap_err();
        assert!(matches!(err, AdapterError::Script(ref e) if e.line == 2));
        assert!(adapter.schema_dump().unwrap().unwrap().contains("table('legacy'"));
    }

    #[test]
    fn missing_script_is_a_read_error() {
        let mut adapter = adapter("");
        let err = adapter.schema_load(Path::new("/nonexistent/schema.strata")).unwrap_err();
        assert!(matches!(err, AdapterError::Read(..)));
    }
}
