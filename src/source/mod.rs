//! Raw source adapters
//!
//! Each supported dump format has an adapter that knows its column layout.
//! The shared ingest loop splits lines, hands them to the adapter, and keeps
//! the records that survive cleaning.

mod ebird;
mod gbif;
mod ingest;
mod lines;
mod record;
mod traits;
mod vertnet;

pub use ebird::EBirdAdapter;
pub use gbif::GbifAdapter;
pub use ingest::{ingest, ingest_line, split_line, IngestReport};
pub use lines::{FileLineSource, LineSource};
pub use record::{CleanedRecord, Coordinates, SourceKind, Taxonomy};
pub use traits::{RejectionReason, SourceAdapter};
pub use vertnet::VertNetAdapter;
