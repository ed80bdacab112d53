//! Biostar: occurrence dumps normalized into a star schema
//!
//! Raw biodiversity occurrence dumps from several publishers, each with its
//! own column layout, are cleaned into a common record shape and then
//! reorganized into a taxonomy dimension, a location dimension, a
//! taxonomy-location association, and one occurrence fact table per source.
//!
//! # Stages
//!
//! - **Ingest**: split raw lines, clean fields, drop invalid records
//! - **Dimensions**: distinct taxonomy and location keys, one surrogate id each
//! - **Pairs**: taxonomy-location combinations that actually co-occur
//! - **Facts**: every record joined back to its surrogate keys
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use biostar::{OpenStore, Pipeline, SqliteStore};
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! let pipeline = Pipeline::with_store(Arc::new(store));
//! // Pipeline is ready for use
//! ```

pub mod clean;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod source;
pub mod star;
pub mod storage;

pub use config::{ConfigError, InputConfig, PipelineConfig};
pub use export::{export_table, Delimiter, ExportOptions};
pub use pipeline::{Pipeline, PipelineError, PipelineResult, RunReport};
pub use source::{CleanedRecord, Coordinates, FileLineSource, LineSource, SourceKind, Taxonomy};
pub use star::{IdStrategy, LocId, OccurrenceFact, TaxId, TaxLocId};
pub use storage::{OpenStore, SqliteStore, StorageError, StorageResult, TableStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
