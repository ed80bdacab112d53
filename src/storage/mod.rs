//! Storage backends for materialized tables
//!
//! Every pipeline stage reads and writes through the `TableStore` trait.
//! The primary implementation is `SqliteStore` for persistent storage.

mod schema;
mod sqlite;
mod traits;

pub use schema::{TableSchema, Tabular};
pub use sqlite::SqliteStore;
pub use traits::{
    read_table, write_table, OpenStore, StorageError, StorageResult, TableInfo, TableStore,
};
