//! Storage trait definitions

use super::schema::{TableSchema, Tabular};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Schema mismatch for {path}: expected {expected}, found {found}")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Table path {path} collides with existing path {existing}")]
    PathCollision { path: String, existing: String },

    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Date parsing error: {0}")]
    DateParse(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Catalog entry for a materialized table
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub path: String,
    pub schema: TableSchema,
    pub rows: usize,
    pub materialized_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for materialized table backends
///
/// A table lives at a path and carries an explicit schema. Writing a path
/// replaces whatever was there; reading checks the stored schema against
/// the caller's expectation.
pub trait TableStore: Send + Sync {
    /// Replace the table at `path` with `rows`. Returns the row count.
    ///
    /// Either every row is written or the previous table is left untouched.
    fn write_rows(
        &self,
        path: &str,
        schema: &TableSchema,
        rows: &mut dyn Iterator<Item = Vec<String>>,
    ) -> StorageResult<usize>;

    /// Read every row of the table at `path`, verifying its schema
    fn read_rows(&self, path: &str, schema: &TableSchema) -> StorageResult<Vec<Vec<String>>>;

    /// Catalog entry for `path`, if materialized
    fn table_info(&self, path: &str) -> StorageResult<Option<TableInfo>>;

    /// All materialized table paths, sorted
    fn list_tables(&self) -> StorageResult<Vec<String>>;

    /// Remove the table at `path`. Returns whether it existed.
    fn drop_table(&self, path: &str) -> StorageResult<bool>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: TableStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}

/// Write typed rows to `path`
pub fn write_table<T: Tabular>(
    store: &dyn TableStore,
    path: &str,
    layout: T::Layout,
    rows: &[T],
) -> StorageResult<usize> {
    let schema = T::schema(layout);
    let mut fields = rows.iter().map(T::to_fields);
    store.write_rows(path, &schema, &mut fields)
}

/// Read typed rows from `path`
pub fn read_table<T: Tabular>(
    store: &dyn TableStore,
    path: &str,
    layout: T::Layout,
) -> StorageResult<Vec<T>> {
    let schema = T::schema(layout);
    store
        .read_rows(path, &schema)?
        .into_iter()
        .map(|fields| T::from_fields(layout, fields))
        .collect()
}
