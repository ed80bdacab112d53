//! Taxonomy-location pairs that co-occur in the records

use super::ids::{IdStrategy, LocId, TaxId, TaxLocId};
use super::types::{LocationRow, TaxLocRow, TaxonomyRow};
use crate::source::{CleanedRecord, Coordinates, Taxonomy};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Natural key to surrogate lookups over both dimensions
#[derive(Debug, Default)]
pub struct DimensionIndex<'a> {
    taxonomy: HashMap<&'a Taxonomy, TaxId>,
    locations: HashMap<&'a Coordinates, LocId>,
}

impl<'a> DimensionIndex<'a> {
    pub fn new(taxonomy: &'a [TaxonomyRow], locations: &'a [LocationRow]) -> Self {
        Self {
            taxonomy: taxonomy.iter().map(|row| (&row.taxonomy, row.tax_id)).collect(),
            locations: locations
                .iter()
                .map(|row| (&row.coordinates, row.loc_id))
                .collect(),
        }
    }

    pub fn tax_id(&self, taxonomy: &Taxonomy) -> Option<TaxId> {
        self.taxonomy.get(taxonomy).copied()
    }

    pub fn loc_id(&self, coordinates: &Coordinates) -> Option<LocId> {
        self.locations.get(coordinates).copied()
    }

    /// Both surrogates for a record, or `None` if either key is unknown
    pub fn resolve(&self, record: &CleanedRecord) -> Option<(TaxId, LocId)> {
        Some((self.tax_id(&record.taxonomy)?, self.loc_id(&record.coordinates)?))
    }
}

/// Result of [`resolve_pairs`]
#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    pub rows: Vec<TaxLocRow>,
    /// Records whose taxonomy or location had no dimension row
    pub misses: usize,
}

/// Distinct (tax_id, loc_id) pairs across `records`, each with a fresh id.
///
/// Inner-join semantics: a record that does not resolve against both
/// dimensions contributes no pair.
pub fn resolve_pairs<'r>(
    taxonomy: &[TaxonomyRow],
    locations: &[LocationRow],
    records: impl IntoIterator<Item = &'r CleanedRecord>,
    strategy: &IdStrategy,
) -> ResolveOutcome {
    let index = DimensionIndex::new(taxonomy, locations);
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut misses = 0;

    for record in records {
        let Some(pair) = index.resolve(record) else {
            misses += 1;
            continue;
        };
        if seen.insert(pair) {
            rows.push(TaxLocRow {
                taxloc_id: TaxLocId::from(strategy.generate(&pair)),
                tax_id: pair.0,
                loc_id: pair.1,
            });
        }
    }

    if misses > 0 {
        warn!("{} records did not resolve to a taxonomy-location pair", misses);
    }
    ResolveOutcome { rows, misses }
}
