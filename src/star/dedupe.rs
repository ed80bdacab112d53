//! Distinct natural keys with one surrogate id each

use super::ids::{IdStrategy, LocId, NaturalKey, TaxId};
use super::types::{LocationRow, TaxonomyRow};
use crate::source::CleanedRecord;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// Collapse `keys` to their distinct values and give each a fresh id.
///
/// First-seen order is kept so output is stable for a given input, but
/// callers should not rely on row order.
pub fn deduplicate<K, I>(keys: I, strategy: &IdStrategy) -> Vec<(Uuid, K)>
where
    K: NaturalKey,
    I: IntoIterator<Item = K>,
{
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for key in keys {
        if seen.insert(key.clone()) {
            distinct.push(key);
        }
    }
    distinct
        .into_iter()
        .map(|key| (strategy.generate(&key), key))
        .collect()
}

/// Taxonomy dimension over every record
pub fn taxonomy_dimension<'a>(
    records: impl IntoIterator<Item = &'a CleanedRecord>,
    strategy: &IdStrategy,
) -> Vec<TaxonomyRow> {
    let rows: Vec<TaxonomyRow> = deduplicate(records.into_iter().map(|r| r.taxonomy.clone()), strategy)
        .into_iter()
        .map(|(id, taxonomy)| TaxonomyRow {
            tax_id: TaxId::from(id),
            taxonomy,
        })
        .collect();
    debug!("taxonomy dimension: {} distinct keys", rows.len());
    rows
}

/// Location dimension over every record
pub fn location_dimension<'a>(
    records: impl IntoIterator<Item = &'a CleanedRecord>,
    strategy: &IdStrategy,
) -> Vec<LocationRow> {
    let rows: Vec<LocationRow> = deduplicate(records.into_iter().map(|r| r.coordinates.clone()), strategy)
        .into_iter()
        .map(|(id, coordinates)| LocationRow {
            loc_id: LocId::from(id),
            coordinates,
        })
        .collect();
    debug!("location dimension: {} distinct keys", rows.len());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Coordinates;
    use rand::Rng;

    #[test]
    fn test_cardinality_matches_distinct_keys() {
        let mut rng = rand::thread_rng();
        let keys: Vec<Coordinates> = (0..500)
            .map(|_| {
                Coordinates::new(
                    rng.gen_range(-5..=5).to_string(),
                    rng.gen_range(-5..=5).to_string(),
                )
            })
            .collect();
        let expected: HashSet<_> = keys.iter().cloned().collect();

        let rows = deduplicate(keys, &IdStrategy::Random);
        assert_eq!(rows.len(), expected.len());

        let ids: HashSet<_> = rows.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), rows.len());
        assert!(rows.iter().all(|(id, _)| !id.is_nil()));

        let keys: HashSet<_> = rows.into_iter().map(|(_, k)| k).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_empty_input() {
        let rows = deduplicate(Vec::<Coordinates>::new(), &IdStrategy::Random);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_deterministic_ids_repeat_across_calls() {
        let keys = vec![Coordinates::new("1", "2"), Coordinates::new("3", "4")];
        let a = deduplicate(keys.clone(), &IdStrategy::Deterministic);
        let b = deduplicate(keys, &IdStrategy::Deterministic);
        assert_eq!(a, b);
    }
}
