//! Dimension and fact rows

use super::ids::{LocId, TaxId, TaxLocId};
use crate::source::{CleanedRecord, Coordinates, SourceKind, Taxonomy};
use crate::storage::{StorageError, StorageResult, TableSchema, Tabular};

fn parse_id<T>(
    text: &str,
    what: &str,
    parse: impl FnOnce(&str) -> Result<T, uuid::Error>,
) -> StorageResult<T> {
    parse(text).map_err(|e| StorageError::MalformedRow(format!("bad {} '{}': {}", what, text, e)))
}

fn expect_width(table: &str, fields: &[String], expected: usize) -> StorageResult<()> {
    if fields.len() != expected {
        return Err(StorageError::MalformedRow(format!(
            "{} row has {} fields, expected {}",
            table,
            fields.len(),
            expected
        )));
    }
    Ok(())
}

/// One row of the taxonomy dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyRow {
    pub tax_id: TaxId,
    pub taxonomy: Taxonomy,
}

impl Tabular for TaxonomyRow {
    type Layout = ();

    fn schema(_: ()) -> TableSchema {
        TableSchema::new(
            "taxonomy",
            1,
            std::iter::once("tax_id").chain(Taxonomy::FIELDS),
        )
    }

    fn to_fields(&self) -> Vec<String> {
        std::iter::once(self.tax_id.to_string())
            .chain(self.taxonomy.fields().iter().map(|f| f.to_string()))
            .collect()
    }

    fn from_fields(_: (), fields: Vec<String>) -> StorageResult<Self> {
        expect_width("taxonomy", &fields, 1 + Taxonomy::FIELDS.len())?;
        let mut fields = fields.into_iter();
        let tax_id = parse_id(&fields.next().unwrap_or_default(), "tax_id", TaxId::parse)?;
        Ok(Self {
            tax_id,
            taxonomy: Taxonomy::from_fields(&mut fields),
        })
    }
}

/// One row of the location dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRow {
    pub loc_id: LocId,
    pub coordinates: Coordinates,
}

impl Tabular for LocationRow {
    type Layout = ();

    fn schema(_: ()) -> TableSchema {
        TableSchema::new(
            "location",
            1,
            std::iter::once("loc_id").chain(Coordinates::FIELDS),
        )
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.loc_id.to_string(),
            self.coordinates.lat.clone(),
            self.coordinates.lon.clone(),
        ]
    }

    fn from_fields(_: (), fields: Vec<String>) -> StorageResult<Self> {
        expect_width("location", &fields, 3)?;
        let mut fields = fields.into_iter();
        let loc_id = parse_id(&fields.next().unwrap_or_default(), "loc_id", LocId::parse)?;
        let lat = fields.next().unwrap_or_default();
        let lon = fields.next().unwrap_or_default();
        Ok(Self {
            loc_id,
            coordinates: Coordinates::new(lat, lon),
        })
    }
}

/// One row of the taxonomy-location association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxLocRow {
    pub taxloc_id: TaxLocId,
    pub tax_id: TaxId,
    pub loc_id: LocId,
}

impl Tabular for TaxLocRow {
    type Layout = ();

    fn schema(_: ()) -> TableSchema {
        TableSchema::new("taxonomy_location", 1, ["taxloc_id", "tax_id", "loc_id"])
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.taxloc_id.to_string(),
            self.tax_id.to_string(),
            self.loc_id.to_string(),
        ]
    }

    fn from_fields(_: (), fields: Vec<String>) -> StorageResult<Self> {
        expect_width("taxonomy_location", &fields, 3)?;
        Ok(Self {
            taxloc_id: parse_id(&fields[0], "taxloc_id", TaxLocId::parse)?,
            tax_id: parse_id(&fields[1], "tax_id", TaxId::parse)?,
            loc_id: parse_id(&fields[2], "loc_id", LocId::parse)?,
        })
    }
}

/// An occurrence with its resolved surrogate keys.
///
/// `tax_id` and `loc_id` are set exactly when the record's source exposes
/// dimension keys in its fact table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceFact {
    pub taxloc_id: TaxLocId,
    pub tax_id: Option<TaxId>,
    pub loc_id: Option<LocId>,
    pub record: CleanedRecord,
}

impl OccurrenceFact {
    pub fn source(&self) -> SourceKind {
        self.record.source
    }
}

impl Tabular for OccurrenceFact {
    type Layout = SourceKind;

    fn schema(source: SourceKind) -> TableSchema {
        let mut fields = vec!["taxloc_id".to_string()];
        if source.exposes_dimension_keys() {
            fields.push("tax_id".into());
            fields.push("loc_id".into());
        }
        fields.extend(CleanedRecord::field_names(source));
        TableSchema::new(format!("occurrence_{}", source), 1, fields)
    }

    fn to_fields(&self) -> Vec<String> {
        let mut fields = vec![self.taxloc_id.to_string()];
        if self.source().exposes_dimension_keys() {
            fields.push(self.tax_id.map(|id| id.to_string()).unwrap_or_default());
            fields.push(self.loc_id.map(|id| id.to_string()).unwrap_or_default());
        }
        fields.extend(self.record.values());
        fields
    }

    fn from_fields(source: SourceKind, fields: Vec<String>) -> StorageResult<Self> {
        let keys = if source.exposes_dimension_keys() { 3 } else { 1 };
        if fields.len() < keys {
            return Err(StorageError::MalformedRow(format!(
                "occurrence_{} row has {} fields",
                source,
                fields.len()
            )));
        }

        let mut fields = fields;
        let record_fields = fields.split_off(keys);
        let taxloc_id = parse_id(&fields[0], "taxloc_id", TaxLocId::parse)?;
        let (tax_id, loc_id) = if source.exposes_dimension_keys() {
            (
                Some(parse_id(&fields[1], "tax_id", TaxId::parse)?),
                Some(parse_id(&fields[2], "loc_id", LocId::parse)?),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            taxloc_id,
            tax_id,
            loc_id,
            record: CleanedRecord::from_values(source, record_fields)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{read_table, write_table, OpenStore, SqliteStore};
    use uuid::Uuid;

    fn record(source: SourceKind) -> CleanedRecord {
        CleanedRecord {
            uuid: Uuid::new_v4(),
            source,
            occurrence_id: "urn:occ:1".into(),
            taxonomy: Taxonomy {
                scientific_name: "Peromyscus maniculatus".into(),
                kingdom: "Animalia".into(),
                phylum: "Chordata".into(),
                class: "Mammalia".into(),
                order: "Rodentia".into(),
                family: String::new(),
                genus: "Peromyscus".into(),
            },
            coordinates: Coordinates::new("39.539146", "-87.41389"),
            precision: String::new(),
            year: "1962".into(),
            month: "7".into(),
            day: "14".into(),
            season: "3".into(),
            remainder: source.remainder_fields().iter().map(|_| "x".to_string()).collect(),
        }
    }

    #[test]
    fn test_fact_schema_depends_on_source() {
        let vertnet = OccurrenceFact::schema(SourceKind::VertNet);
        assert_eq!(&vertnet.fields[..3], ["taxloc_id", "tax_id", "loc_id"]);

        let ebird = OccurrenceFact::schema(SourceKind::EBird);
        assert_eq!(ebird.fields[0], "taxloc_id");
        assert_eq!(ebird.fields[1], "uuid");
        assert!(!ebird.fields.iter().any(|f| f == "tax_id"));
    }

    #[test]
    fn test_fact_rows_survive_storage() {
        let store = SqliteStore::open_in_memory().unwrap();
        let fact = OccurrenceFact {
            taxloc_id: TaxLocId::from(Uuid::new_v4()),
            tax_id: Some(TaxId::from(Uuid::new_v4())),
            loc_id: Some(LocId::from(Uuid::new_v4())),
            record: record(SourceKind::Gbif),
        };
        write_table(&store, "fact/gbif", SourceKind::Gbif, std::slice::from_ref(&fact)).unwrap();
        let back: Vec<OccurrenceFact> = read_table(&store, "fact/gbif", SourceKind::Gbif).unwrap();
        assert_eq!(back, vec![fact]);
    }

    #[test]
    fn test_ebird_fact_omits_dimension_keys() {
        let fact = OccurrenceFact {
            taxloc_id: TaxLocId::from(Uuid::new_v4()),
            tax_id: None,
            loc_id: None,
            record: record(SourceKind::EBird),
        };
        let fields = fact.to_fields();
        assert_eq!(fields.len(), OccurrenceFact::schema(SourceKind::EBird).width());
        let back = OccurrenceFact::from_fields(SourceKind::EBird, fields).unwrap();
        assert_eq!(back, fact);
    }

    #[test]
    fn test_dimension_rows_round_trip() {
        let tax = TaxonomyRow {
            tax_id: TaxId::from(Uuid::new_v4()),
            taxonomy: record(SourceKind::VertNet).taxonomy,
        };
        assert_eq!(TaxonomyRow::from_fields((), tax.to_fields()).unwrap(), tax);

        let loc = LocationRow {
            loc_id: LocId::from(Uuid::new_v4()),
            coordinates: Coordinates::new("-12.5", "130.84"),
        };
        assert_eq!(LocationRow::from_fields((), loc.to_fields()).unwrap(), loc);
    }

    #[test]
    fn test_malformed_dimension_rows_are_rejected() {
        let err = LocationRow::from_fields((), vec!["x".into(), "1".into(), "2".into()]).unwrap_err();
        assert!(matches!(err, StorageError::MalformedRow(_)));
        assert!(TaxLocRow::from_fields((), vec!["a".into()]).is_err());
    }
}
