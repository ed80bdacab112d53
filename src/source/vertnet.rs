//! VertNet Darwin Core harvest
//!
//! Harvested pages are concatenated as they come off the publishers'
//! endpoints, so lines routinely carry a trailing empty column or extra
//! columns. Lines are padded or truncated to the schema width.

use super::record::{CleanedRecord, SourceKind, Taxonomy};
use super::traits::{column_positions, field, finish, RawParts, RejectionReason, SourceAdapter};
use crate::clean::parse_date;
use uuid::Uuid;

pub(crate) const COLUMNS: &[&str] = &[
    "occurrenceid",
    "institutioncode",
    "collectioncode",
    "catalognumber",
    "basisofrecord",
    "scientificname",
    "kingdom",
    "phylum",
    "classs",
    "order",
    "family",
    "genus",
    "specificepithet",
    "infraspecificepithet",
    "decimallatitude",
    "decimallongitude",
    "coordinateuncertaintyinmeters",
    "geodeticdatum",
    "eventdate",
    "country",
    "stateprovince",
    "county",
    "locality",
    "recordedby",
];

pub(crate) const REMAINDER: &[&str] = &[
    "institutioncode",
    "collectioncode",
    "catalognumber",
    "basisofrecord",
    "specificepithet",
    "infraspecificepithet",
    "geodeticdatum",
    "country",
    "stateprovince",
    "county",
    "locality",
    "recordedby",
];

const OCCURRENCE_ID: usize = 0;
const SCIENTIFIC_NAME: usize = 5;
const KINGDOM: usize = 6;
const PHYLUM: usize = 7;
const CLASS: usize = 8;
const ORDER: usize = 9;
const FAMILY: usize = 10;
const GENUS: usize = 11;
const LATITUDE: usize = 14;
const LONGITUDE: usize = 15;
const UNCERTAINTY: usize = 16;
const EVENT_DATE: usize = 18;

pub struct VertNetAdapter {
    sigfigs: usize,
    remainder: Vec<usize>,
}

impl VertNetAdapter {
    pub fn new(sigfigs: usize) -> Self {
        Self {
            sigfigs,
            remainder: column_positions(COLUMNS, REMAINDER),
        }
    }
}

impl SourceAdapter for VertNetAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::VertNet
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }

    fn ragged(&self) -> bool {
        true
    }

    fn clean(&self, uuid: Uuid, fields: &[&str]) -> Result<CleanedRecord, RejectionReason> {
        let (year, month, day) = parse_date(field(fields, EVENT_DATE));
        let parts = RawParts {
            occurrence_id: field(fields, OCCURRENCE_ID),
            taxonomy: Taxonomy {
                scientific_name: field(fields, SCIENTIFIC_NAME).to_string(),
                kingdom: field(fields, KINGDOM).to_string(),
                phylum: field(fields, PHYLUM).to_string(),
                class: field(fields, CLASS).to_string(),
                order: field(fields, ORDER).to_string(),
                family: field(fields, FAMILY).to_string(),
                genus: field(fields, GENUS).to_string(),
            },
            lat: field(fields, LATITUDE),
            lon: field(fields, LONGITUDE),
            precision: field(fields, UNCERTAINTY),
            year: &year,
            month: &month,
            day: Some(day.as_str()),
            remainder: self
                .remainder
                .iter()
                .map(|&i| field(fields, i).to_string())
                .collect(),
        };
        finish(SourceKind::VertNet, uuid, self.sigfigs, parts)
    }
}
