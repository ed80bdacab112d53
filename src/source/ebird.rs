//! eBird Basic Dataset
//!
//! Checklist observations of birds only. The dump has no rank columns, so
//! the higher taxonomy is fixed and the genus is taken from the binomial.
//! Both the scientific and the common name must be valid.

use super::record::{CleanedRecord, SourceKind, Taxonomy};
use super::traits::{column_positions, field, finish, RawParts, RejectionReason, SourceAdapter};
use crate::clean::{parse_date, valid_name};
use uuid::Uuid;

pub(crate) const COLUMNS: &[&str] = &[
    "global_unique_identifier",
    "taxonomic_order",
    "category",
    "common_name",
    "scientific_name",
    "subspecies_common_name",
    "subspecies_scientific_name",
    "observation_count",
    "country",
    "country_code",
    "state",
    "state_code",
    "county",
    "county_code",
    "locality",
    "locality_id",
    "locality_type",
    "latitude",
    "longitude",
    "observation_date",
    "time_observations_started",
    "observer_id",
    "sampling_event_identifier",
];

pub(crate) const REMAINDER: &[&str] = &[
    "taxonomic_order",
    "category",
    "common_name",
    "subspecies_common_name",
    "subspecies_scientific_name",
    "observation_count",
    "country",
    "country_code",
    "state",
    "state_code",
    "county",
    "county_code",
    "locality",
    "locality_id",
    "locality_type",
    "time_observations_started",
    "observer_id",
    "sampling_event_identifier",
];

const GLOBAL_ID: usize = 0;
const COMMON_NAME: usize = 3;
const SCIENTIFIC_NAME: usize = 4;
const LATITUDE: usize = 17;
const LONGITUDE: usize = 18;
const OBSERVATION_DATE: usize = 19;

pub struct EBirdAdapter {
    sigfigs: usize,
    remainder: Vec<usize>,
}

impl EBirdAdapter {
    pub fn new(sigfigs: usize) -> Self {
        Self {
            sigfigs,
            remainder: column_positions(COLUMNS, REMAINDER),
        }
    }
}

fn bird_taxonomy(scientific_name: &str) -> Taxonomy {
    Taxonomy {
        scientific_name: scientific_name.to_string(),
        kingdom: "Animalia".to_string(),
        phylum: "Chordata".to_string(),
        class: "Aves".to_string(),
        order: String::new(),
        family: String::new(),
        genus: scientific_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

impl SourceAdapter for EBirdAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::EBird
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }

    fn clean(&self, uuid: Uuid, fields: &[&str]) -> Result<CleanedRecord, RejectionReason> {
        let (year, month, day) = parse_date(field(fields, OBSERVATION_DATE));
        let parts = RawParts {
            occurrence_id: field(fields, GLOBAL_ID),
            taxonomy: bird_taxonomy(field(fields, SCIENTIFIC_NAME)),
            lat: field(fields, LATITUDE),
            lon: field(fields, LONGITUDE),
            precision: "",
            year: &year,
            month: &month,
            day: Some(day.as_str()),
            remainder: self
                .remainder
                .iter()
                .map(|&i| field(fields, i).to_string())
                .collect(),
        };
        let record = finish(SourceKind::EBird, uuid, self.sigfigs, parts)?;

        if !valid_name(Some(field(fields, COMMON_NAME))) {
            return Err(RejectionReason::InvalidName("common name"));
        }
        Ok(record)
    }
}
