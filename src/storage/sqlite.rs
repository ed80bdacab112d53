//! SQLite storage backend for materialized tables

use super::schema::TableSchema;
use super::traits::{OpenStore, StorageError, StorageResult, TableInfo, TableStore};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed table store
///
/// Each materialized table is an SQLite table with one TEXT column per
/// schema field, plus a row number that preserves write order. A catalog
/// table records the path, schema, and row count of every table.
/// Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Row-order column; never a schema field name
const ROW_COLUMN: &str = "__row_no";

impl SqliteStore {
    /// Initialize the catalog
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS table_catalog (
                path TEXT PRIMARY KEY,
                table_name TEXT NOT NULL UNIQUE,
                schema_name TEXT NOT NULL,
                schema_version INTEGER NOT NULL,
                fields_json TEXT NOT NULL,
                row_count INTEGER NOT NULL,
                materialized_at TEXT NOT NULL
            );

            -- Readers see the previous table while a stage rewrites it
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    /// SQLite table backing a path: `fact/vertnet` → `t_fact_vertnet`
    fn table_name(path: &str) -> String {
        let sanitized: String = path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        format!("t_{}", sanitized)
    }

    fn quote_ident(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn column_list(schema: &TableSchema) -> String {
        schema
            .fields
            .iter()
            .map(|f| Self::quote_ident(f))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Load a catalog entry together with its backing table name
    fn load_info(conn: &Connection, path: &str) -> StorageResult<Option<(String, TableInfo)>> {
        let row: Option<(String, String, u32, String, i64, String)> = conn
            .query_row(
                "SELECT table_name, schema_name, schema_version, fields_json, row_count, materialized_at
                 FROM table_catalog WHERE path = ?1",
                params![path],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((table_name, schema_name, version, fields_json, row_count, materialized_at)) = row else {
            return Ok(None);
        };

        let fields: Vec<String> = serde_json::from_str(&fields_json)?;
        let materialized_at = DateTime::parse_from_rfc3339(&materialized_at)
            .map_err(|e| StorageError::DateParse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(Some((
            table_name,
            TableInfo {
                path: path.to_string(),
                schema: TableSchema::new(schema_name, version, fields),
                rows: row_count as usize,
                materialized_at,
            },
        )))
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl TableStore for SqliteStore {
    fn write_rows(
        &self,
        path: &str,
        schema: &TableSchema,
        rows: &mut dyn Iterator<Item = Vec<String>>,
    ) -> StorageResult<usize> {
        let table = Self::table_name(path);
        let quoted = Self::quote_ident(&table);
        let width = schema.width();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT path FROM table_catalog WHERE table_name = ?1 AND path != ?2",
                params![table, path],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(existing) = existing {
            return Err(StorageError::PathCollision {
                path: path.to_string(),
                existing,
            });
        }

        let column_defs: Vec<String> = schema
            .fields
            .iter()
            .map(|f| format!("{} TEXT NOT NULL", Self::quote_ident(f)))
            .collect();
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} ({row} INTEGER PRIMARY KEY, {columns});",
            table = quoted,
            row = ROW_COLUMN,
            columns = column_defs.join(", "),
        ))?;

        let mut count = 0usize;
        {
            let placeholders: Vec<String> = (1..=width).map(|i| format!("?{}", i)).collect();
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quoted,
                Self::column_list(schema),
                placeholders.join(", ")
            ))?;

            for row in rows {
                if row.len() != width {
                    return Err(StorageError::MalformedRow(format!(
                        "{} row {} has {} fields, schema {} has {}",
                        path,
                        count + 1,
                        row.len(),
                        schema.name,
                        width
                    )));
                }
                stmt.execute(params_from_iter(row.iter()))?;
                count += 1;
            }
        }

        tx.execute(
            r#"
            INSERT INTO table_catalog (path, table_name, schema_name, schema_version, fields_json, row_count, materialized_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(path) DO UPDATE SET
                schema_name = excluded.schema_name,
                schema_version = excluded.schema_version,
                fields_json = excluded.fields_json,
                row_count = excluded.row_count,
                materialized_at = excluded.materialized_at
            "#,
            params![
                path,
                table,
                schema.name,
                schema.version,
                serde_json::to_string(&schema.fields)?,
                count as i64,
                Utc::now().to_rfc3339(),
            ],
        )?;
        tx.commit()?;

        Ok(count)
    }

    fn read_rows(&self, path: &str, schema: &TableSchema) -> StorageResult<Vec<Vec<String>>> {
        let conn = self.conn()?;
        let (table, info) =
            Self::load_info(&conn, path)?.ok_or_else(|| StorageError::TableNotFound(path.to_string()))?;

        if &info.schema != schema {
            return Err(StorageError::SchemaMismatch {
                path: path.to_string(),
                expected: schema.to_string(),
                found: info.schema.to_string(),
            });
        }

        let width = schema.width();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY {}",
            Self::column_list(schema),
            Self::quote_ident(&table),
            ROW_COLUMN
        ))?;
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, String>(i))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn table_info(&self, path: &str) -> StorageResult<Option<TableInfo>> {
        let conn = self.conn()?;
        Ok(Self::load_info(&conn, path)?.map(|(_, info)| info))
    }

    fn list_tables(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT path FROM table_catalog ORDER BY path")?;
        let paths = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paths)
    }

    fn drop_table(&self, path: &str) -> StorageResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let Some((table, _)) = Self::load_info(&tx, path)? else {
            return Ok(false);
        };
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", Self::quote_ident(&table)))?;
        tx.execute("DELETE FROM table_catalog WHERE path = ?1", params![path])?;
        tx.commit()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn location_schema() -> TableSchema {
        TableSchema::new("location", 1, ["loc_id", "lat", "lon"])
    }

    fn rows(values: &[[&str; 3]]) -> Vec<Vec<String>> {
        values
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect()
    }

    fn write(store: &SqliteStore, path: &str, schema: &TableSchema, data: Vec<Vec<String>>) -> StorageResult<usize> {
        store.write_rows(path, schema, &mut data.into_iter())
    }

    #[test]
    fn test_write_and_read_in_order() {
        let store = create_test_store();
        let data = rows(&[["a", "1", "2"], ["b", "3", "4"], ["c", "", "6"]]);

        let written = write(&store, "dim/location", &location_schema(), data.clone()).unwrap();
        assert_eq!(written, 3);

        let read = store.read_rows("dim/location", &location_schema()).unwrap();
        assert_eq!(read, data);
    }

    #[test]
    fn test_write_overwrites_previous_table() {
        let store = create_test_store();
        write(&store, "dim/location", &location_schema(), rows(&[["a", "1", "2"], ["b", "3", "4"]])).unwrap();
        write(&store, "dim/location", &location_schema(), rows(&[["z", "9", "9"]])).unwrap();

        let read = store.read_rows("dim/location", &location_schema()).unwrap();
        assert_eq!(read, rows(&[["z", "9", "9"]]));
        assert_eq!(store.table_info("dim/location").unwrap().unwrap().rows, 1);
    }

    #[test]
    fn test_reserved_words_as_field_names() {
        let store = create_test_store();
        let schema = TableSchema::new("taxonomy", 1, ["order", "class", "group"]);
        write(&store, "dim/taxonomy", &schema, rows(&[["Rodentia", "Mammalia", "x"]])).unwrap();
        assert_eq!(store.read_rows("dim/taxonomy", &schema).unwrap()[0][0], "Rodentia");
    }

    #[test]
    fn test_missing_table() {
        let store = create_test_store();
        let err = store.read_rows("dim/nowhere", &location_schema()).unwrap_err();
        assert!(matches!(err, StorageError::TableNotFound(p) if p == "dim/nowhere"));
        assert!(store.table_info("dim/nowhere").unwrap().is_none());
    }

    #[test]
    fn test_schema_mismatch_is_rejected() {
        let store = create_test_store();
        write(&store, "dim/location", &location_schema(), rows(&[["a", "1", "2"]])).unwrap();

        let newer = TableSchema::new("location", 2, ["loc_id", "lat", "lon"]);
        let err = store.read_rows("dim/location", &newer).unwrap_err();
        assert!(matches!(err, StorageError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_malformed_row_leaves_previous_table() {
        let store = create_test_store();
        write(&store, "dim/location", &location_schema(), rows(&[["a", "1", "2"]])).unwrap();

        let bad = vec![
            vec!["b".to_string(), "3".to_string(), "4".to_string()],
            vec!["c".to_string()],
        ];
        let err = write(&store, "dim/location", &location_schema(), bad).unwrap_err();
        assert!(matches!(err, StorageError::MalformedRow(_)));

        let read = store.read_rows("dim/location", &location_schema()).unwrap();
        assert_eq!(read, rows(&[["a", "1", "2"]]));
    }

    #[test]
    fn test_path_collision_is_rejected() {
        let store = create_test_store();
        write(&store, "dim/location", &location_schema(), rows(&[["a", "1", "2"]])).unwrap();

        let err = write(&store, "dim_location", &location_schema(), rows(&[["b", "1", "2"]])).unwrap_err();
        assert!(matches!(err, StorageError::PathCollision { .. }));
        assert_eq!(store.read_rows("dim/location", &location_schema()).unwrap().len(), 1);
    }

    #[test]
    fn test_list_tables_sorted() {
        let store = create_test_store();
        write(&store, "fact/vertnet", &location_schema(), Vec::new()).unwrap();
        write(&store, "dim/location", &location_schema(), Vec::new()).unwrap();
        assert_eq!(store.list_tables().unwrap(), vec!["dim/location", "fact/vertnet"]);
    }

    #[test]
    fn test_drop_table() {
        let store = create_test_store();
        write(&store, "fact/vertnet", &location_schema(), rows(&[["a", "1", "2"]])).unwrap();
        write(&store, "dim/location", &location_schema(), Vec::new()).unwrap();

        assert!(store.drop_table("fact/vertnet").unwrap());
        assert!(!store.drop_table("fact/vertnet").unwrap());
        assert_eq!(store.list_tables().unwrap(), vec!["dim/location"]);
        assert!(matches!(
            store.read_rows("fact/vertnet", &location_schema()).unwrap_err(),
            StorageError::TableNotFound(_)
        ));

        // The path can be materialized again
        write(&store, "fact/vertnet", &location_schema(), Vec::new()).unwrap();
    }

    #[test]
    fn test_tables_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("star.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            write(&store, "dim/location", &location_schema(), rows(&[["a", "1", "2"]])).unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        let info = store.table_info("dim/location").unwrap().unwrap();
        assert_eq!(info.schema, location_schema());
        assert_eq!(info.rows, 1);
        assert_eq!(store.read_rows("dim/location", &location_schema()).unwrap().len(), 1);
    }

    #[test]
    fn test_wal_mode_enabled_at_connection() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("wal.db")).unwrap();

        let journal_mode: String = store
            .conn
            .lock()
            .unwrap()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();

        assert_eq!(journal_mode, "wal");
    }
}
