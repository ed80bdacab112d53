//! GBIF occurrence download, simple tab-delimited format
//!
//! Dates arrive pre-split into year and month columns; there is no day.

use super::record::{CleanedRecord, SourceKind, Taxonomy};
use super::traits::{column_positions, field, finish, RawParts, RejectionReason, SourceAdapter};
use uuid::Uuid;

pub(crate) const COLUMNS: &[&str] = &[
    "gbifid",
    "datasetkey",
    "occurrenceid",
    "kingdom",
    "phylum",
    "class",
    "order",
    "family",
    "genus",
    "species",
    "infraspecificepithet",
    "taxonrank",
    "scientificname",
    "countrycode",
    "locality",
    "decimallatitude",
    "decimallongitude",
    "coordinateprecision",
    "year",
    "month",
    "basisofrecord",
    "institutioncode",
    "catalognumber",
    "recordedby",
];

pub(crate) const REMAINDER: &[&str] = &[
    "datasetkey",
    "occurrenceid",
    "infraspecificepithet",
    "taxonrank",
    "scientificname",
    "countrycode",
    "locality",
    "basisofrecord",
    "institutioncode",
    "catalognumber",
    "recordedby",
];

const GBIF_ID: usize = 0;
const KINGDOM: usize = 3;
const PHYLUM: usize = 4;
const CLASS: usize = 5;
const ORDER: usize = 6;
const FAMILY: usize = 7;
const GENUS: usize = 8;
const SPECIES: usize = 9;
const SCIENTIFIC_NAME: usize = 12;
const LATITUDE: usize = 15;
const LONGITUDE: usize = 16;
const PRECISION: usize = 17;
const YEAR: usize = 18;
const MONTH: usize = 19;

pub struct GbifAdapter {
    sigfigs: usize,
    remainder: Vec<usize>,
}

impl GbifAdapter {
    pub fn new(sigfigs: usize) -> Self {
        Self {
            sigfigs,
            remainder: column_positions(COLUMNS, REMAINDER),
        }
    }
}

impl SourceAdapter for GbifAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Gbif
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }

    fn clean(&self, uuid: Uuid, fields: &[&str]) -> Result<CleanedRecord, RejectionReason> {
        // `scientificname` carries authorship; prefer the bare binomial
        let name = match field(fields, SPECIES) {
            "" => field(fields, SCIENTIFIC_NAME),
            species => species,
        };
        let parts = RawParts {
            occurrence_id: field(fields, GBIF_ID),
            taxonomy: Taxonomy {
                scientific_name: name.to_string(),
                kingdom: field(fields, KINGDOM).to_string(),
                phylum: field(fields, PHYLUM).to_string(),
                class: field(fields, CLASS).to_string(),
                order: field(fields, ORDER).to_string(),
                family: field(fields, FAMILY).to_string(),
                genus: field(fields, GENUS).to_string(),
            },
            lat: field(fields, LATITUDE),
            lon: field(fields, LONGITUDE),
            precision: field(fields, PRECISION),
            year: field(fields, YEAR),
            month: field(fields, MONTH),
            day: None,
            remainder: self
                .remainder
                .iter()
                .map(|&i| field(fields, i).to_string())
                .collect(),
        };
        finish(SourceKind::Gbif, uuid, self.sigfigs, parts)
    }
}
