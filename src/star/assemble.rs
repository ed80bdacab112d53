//! Fact rows joined back to every dimension

use super::ids::{LocId, TaxId, TaxLocId};
use super::resolve::DimensionIndex;
use super::types::{LocationRow, OccurrenceFact, TaxLocRow, TaxonomyRow};
use crate::source::CleanedRecord;
use std::collections::HashMap;
use tracing::warn;

/// Result of [`assemble`]
#[derive(Debug, Clone, Default)]
pub struct AssembleOutcome {
    pub facts: Vec<OccurrenceFact>,
    /// Records with no resolvable taxloc_id
    pub dropped: usize,
}

/// Join every record to its tax_id, loc_id and taxloc_id.
///
/// Records that miss any of the three joins are dropped; no fact is ever
/// emitted with a missing surrogate key.
pub fn assemble(
    taxonomy: &[TaxonomyRow],
    locations: &[LocationRow],
    taxloc: &[TaxLocRow],
    records: impl IntoIterator<Item = CleanedRecord>,
) -> AssembleOutcome {
    let index = DimensionIndex::new(taxonomy, locations);
    let pairs: HashMap<(TaxId, LocId), TaxLocId> = taxloc
        .iter()
        .map(|row| ((row.tax_id, row.loc_id), row.taxloc_id))
        .collect();

    let mut outcome = AssembleOutcome::default();
    for record in records {
        let resolved = index
            .resolve(&record)
            .and_then(|pair| pairs.get(&pair).map(|taxloc_id| (pair, *taxloc_id)));
        let Some(((tax_id, loc_id), taxloc_id)) = resolved else {
            outcome.dropped += 1;
            continue;
        };

        let exposed = record.source.exposes_dimension_keys();
        outcome.facts.push(OccurrenceFact {
            taxloc_id,
            tax_id: exposed.then_some(tax_id),
            loc_id: exposed.then_some(loc_id),
            record,
        });
    }

    if outcome.dropped > 0 {
        warn!("{} records dropped without a taxonomy-location pair", outcome.dropped);
    }
    outcome
}
