//! SourceAdapter trait: the contract each raw dump format implements
//!
//! An adapter knows its raw column layout and turns one split line into a
//! cleaned record, or says why the line was dropped.

use super::record::{CleanedRecord, Coordinates, SourceKind, Taxonomy};
use crate::clean::{cleanup_data, season_of, valid_lat_lon, valid_name};
use uuid::Uuid;

/// Why a raw line did not become a cleaned record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Column count does not match a strict schema
    WrongWidth { expected: usize, found: usize },
    /// A required name field is empty or contains a double quote
    InvalidName(&'static str),
    /// Coordinates missing, unparseable, or out of bounds
    InvalidCoordinates,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongWidth { expected, found } => {
                write!(f, "expected {} columns, found {}", expected, found)
            }
            Self::InvalidName(field) => write!(f, "invalid {}", field),
            Self::InvalidCoordinates => write!(f, "invalid coordinates"),
        }
    }
}

/// The contract raw source formats implement.
pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Raw column names in line order
    fn columns(&self) -> &'static [&'static str];

    /// Whether short lines are padded and long lines truncated to
    /// `columns().len()`. Strict formats reject them instead.
    fn ragged(&self) -> bool {
        false
    }

    /// Clean one line whose fields are already aligned to `columns()`.
    fn clean(&self, uuid: Uuid, fields: &[&str]) -> Result<CleanedRecord, RejectionReason>;
}

/// Column positions, looked up once per adapter.
pub(crate) fn column_positions(columns: &[&str], wanted: &[&str]) -> Vec<usize> {
    wanted
        .iter()
        .filter_map(|name| columns.iter().position(|c| c == name))
        .collect()
}

/// Field at `index`, trimmed; empty when the line is short.
pub(crate) fn field<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).map(|f| f.trim()).unwrap_or("")
}

/// Source-neutral view of the fields every adapter extracts.
pub(crate) struct RawParts<'a> {
    pub occurrence_id: &'a str,
    pub taxonomy: Taxonomy,
    pub lat: &'a str,
    pub lon: &'a str,
    pub precision: &'a str,
    pub year: &'a str,
    pub month: &'a str,
    pub day: Option<&'a str>,
    pub remainder: Vec<String>,
}

/// Validate and normalize extracted fields into a cleaned record.
///
/// Coordinates are checked after rounding so the stored values always
/// satisfy the bounds.
pub(crate) fn finish(
    source: SourceKind,
    uuid: Uuid,
    sigfigs: usize,
    parts: RawParts<'_>,
) -> Result<CleanedRecord, RejectionReason> {
    if !valid_name(Some(parts.taxonomy.scientific_name.as_str())) {
        return Err(RejectionReason::InvalidName("scientific name"));
    }

    let cleaned = cleanup_data(
        sigfigs,
        parts.lat,
        parts.lon,
        parts.precision,
        parts.year,
        parts.month,
        parts.day,
    );
    if !valid_lat_lon(&cleaned.lat, &cleaned.lon) {
        return Err(RejectionReason::InvalidCoordinates);
    }

    let season = season_of(&cleaned.lat, &cleaned.month);
    Ok(CleanedRecord {
        uuid,
        source,
        occurrence_id: parts.occurrence_id.trim().to_string(),
        taxonomy: parts.taxonomy,
        coordinates: Coordinates::new(cleaned.lat, cleaned.lon),
        precision: cleaned.precision,
        year: cleaned.year,
        month: cleaned.month,
        day: cleaned.day,
        season,
        remainder: parts.remainder,
    })
}
