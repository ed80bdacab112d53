//! Star schema construction
//!
//! Cleaned records are projected onto their taxonomy and location natural
//! keys, deduplicated into dimensions, resolved into co-occurring pairs, and
//! finally joined back into one fact row per record.

mod assemble;
mod dedupe;
mod ids;
mod resolve;
mod types;

pub use assemble::{assemble, AssembleOutcome};
pub use dedupe::{deduplicate, location_dimension, taxonomy_dimension};
pub use ids::{IdStrategy, LocId, NaturalKey, TaxId, TaxLocId};
pub use resolve::{resolve_pairs, DimensionIndex, ResolveOutcome};
pub use types::{LocationRow, OccurrenceFact, TaxLocRow, TaxonomyRow};
