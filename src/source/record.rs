//! Cleaned record and its natural keys

use crate::storage::{StorageError, StorageResult, TableSchema, Tabular};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::{ebird, gbif, vertnet, SourceAdapter};

/// The raw dump formats this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Darwin Core harvest from VertNet publishers
    VertNet,
    /// eBird Basic Dataset
    EBird,
    /// GBIF occurrence download (simple format)
    Gbif,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::VertNet, SourceKind::EBird, SourceKind::Gbif];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VertNet => "vertnet",
            Self::EBird => "ebird",
            Self::Gbif => "gbif",
        }
    }

    /// Build the adapter for this source, rounding to `sigfigs` places
    pub fn adapter(&self, sigfigs: usize) -> Box<dyn SourceAdapter> {
        match self {
            Self::VertNet => Box::new(vertnet::VertNetAdapter::new(sigfigs)),
            Self::EBird => Box::new(ebird::EBirdAdapter::new(sigfigs)),
            Self::Gbif => Box::new(gbif::GbifAdapter::new(sigfigs)),
        }
    }

    /// Source-specific columns carried through to the fact table, in order
    pub fn remainder_fields(&self) -> &'static [&'static str] {
        match self {
            Self::VertNet => vertnet::REMAINDER,
            Self::EBird => ebird::REMAINDER,
            Self::Gbif => gbif::REMAINDER,
        }
    }

    /// Whether this source's fact table carries tax_id and loc_id next to taxloc_id
    pub fn exposes_dimension_keys(&self) -> bool {
        match self {
            Self::VertNet | Self::Gbif => true,
            Self::EBird => false,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown source '{}' (expected vertnet, ebird or gbif)", s))
    }
}

/// Taxonomic natural key, ordered from name to genus
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Taxonomy {
    pub scientific_name: String,
    pub kingdom: String,
    pub phylum: String,
    pub class: String,
    pub order: String,
    pub family: String,
    pub genus: String,
}

impl Taxonomy {
    pub const FIELDS: [&'static str; 7] =
        ["scientific_name", "kingdom", "phylum", "class", "order", "family", "genus"];

    pub fn fields(&self) -> [&str; 7] {
        [
            &self.scientific_name,
            &self.kingdom,
            &self.phylum,
            &self.class,
            &self.order,
            &self.family,
            &self.genus,
        ]
    }

    pub(crate) fn from_fields(fields: &mut impl Iterator<Item = String>) -> Self {
        let mut next = || fields.next().unwrap_or_default();
        Self {
            scientific_name: next(),
            kingdom: next(),
            phylum: next(),
            class: next(),
            order: next(),
            family: next(),
            genus: next(),
        }
    }
}

/// Location natural key: rounded decimal degrees, as text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: String,
    pub lon: String,
}

impl Coordinates {
    pub const FIELDS: [&'static str; 2] = ["lat", "lon"];

    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }
}

/// A raw record after cleaning and validation.
///
/// Coordinates are always within bounds and the scientific name is valid;
/// records that fail either check never become a `CleanedRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    /// Fresh identifier assigned at ingest
    pub uuid: Uuid,
    pub source: SourceKind,
    /// The source's own occurrence identifier (may be empty)
    pub occurrence_id: String,
    pub taxonomy: Taxonomy,
    pub coordinates: Coordinates,
    pub precision: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub season: String,
    /// Values for `source.remainder_fields()`, same order
    pub remainder: Vec<String>,
}

/// Fields shared by every cleaned table, before the source remainder
const CLEANED_FIELDS: [&str; 16] = [
    "uuid",
    "occurrence_id",
    "scientific_name",
    "kingdom",
    "phylum",
    "class",
    "order",
    "family",
    "genus",
    "lat",
    "lon",
    "precision",
    "year",
    "month",
    "day",
    "season",
];

impl CleanedRecord {
    /// Field names of a cleaned record of `source`, in storage order
    pub fn field_names(source: SourceKind) -> Vec<String> {
        CLEANED_FIELDS
            .iter()
            .chain(source.remainder_fields())
            .map(|f| f.to_string())
            .collect()
    }

    /// Field values in the order of [`CleanedRecord::field_names`]
    pub fn values(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(CLEANED_FIELDS.len() + self.remainder.len());
        values.push(self.uuid.to_string());
        values.push(self.occurrence_id.clone());
        values.extend(self.taxonomy.fields().iter().map(|f| f.to_string()));
        values.push(self.coordinates.lat.clone());
        values.push(self.coordinates.lon.clone());
        values.push(self.precision.clone());
        values.push(self.year.clone());
        values.push(self.month.clone());
        values.push(self.day.clone());
        values.push(self.season.clone());
        values.extend(self.remainder.iter().cloned());
        values
    }

    /// Rebuild a record from values laid out as [`CleanedRecord::field_names`]
    pub(crate) fn from_values(source: SourceKind, values: Vec<String>) -> StorageResult<Self> {
        let expected = CLEANED_FIELDS.len() + source.remainder_fields().len();
        if values.len() != expected {
            return Err(StorageError::MalformedRow(format!(
                "cleaned {} row has {} fields, expected {}",
                source,
                values.len(),
                expected
            )));
        }

        let mut fields = values.into_iter();
        let uuid_text = fields.next().unwrap_or_default();
        let uuid = Uuid::parse_str(&uuid_text)
            .map_err(|e| StorageError::MalformedRow(format!("bad uuid '{}': {}", uuid_text, e)))?;
        let occurrence_id = fields.next().unwrap_or_default();
        let taxonomy = Taxonomy::from_fields(&mut fields);
        let mut next = || fields.next().unwrap_or_default();
        let coordinates = Coordinates::new(next(), next());
        let precision = next();
        let year = next();
        let month = next();
        let day = next();
        let season = next();

        Ok(Self {
            uuid,
            source,
            occurrence_id,
            taxonomy,
            coordinates,
            precision,
            year,
            month,
            day,
            season,
            remainder: fields.collect(),
        })
    }
}

impl Tabular for CleanedRecord {
    type Layout = SourceKind;

    fn schema(source: SourceKind) -> TableSchema {
        TableSchema::new(format!("cleaned_{}", source), 1, Self::field_names(source))
    }

    fn to_fields(&self) -> Vec<String> {
        self.values()
    }

    fn from_fields(source: SourceKind, fields: Vec<String>) -> StorageResult<Self> {
        Self::from_values(source, fields)
    }
}
