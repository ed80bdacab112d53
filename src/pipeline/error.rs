use crate::config::ConfigError;
use crate::storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a pipeline stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no cleaned tables in the store; run ingest first")]
    NoCleanedTables,
}

pub type PipelineResult<T> = Result<T, PipelineError>;
