//! Stage orchestration
//!
//! ingest → {taxonomy, location} dimensions → taxonomy-location pairs → facts.
//! Each stage is fully materialized in the store before the next one reads.

mod engine;
mod error;
pub mod paths;
mod report;

pub use engine::Pipeline;
pub use error::{PipelineError, PipelineResult};
pub use report::{DimensionReport, FactReport, RunReport, TaxLocReport};
