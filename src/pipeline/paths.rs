//! Table paths shared by every stage

use crate::source::SourceKind;

pub const TAXONOMY_TABLE: &str = "dim/taxonomy";
pub const LOCATION_TABLE: &str = "dim/location";
pub const TAXLOC_TABLE: &str = "dim/taxonomy_location";

const CLEANED_PREFIX: &str = "cleaned/";
const FACT_PREFIX: &str = "fact/";

pub fn cleaned_table(source: SourceKind) -> String {
    format!("{}{}", CLEANED_PREFIX, source)
}

pub fn fact_table(source: SourceKind) -> String {
    format!("{}{}", FACT_PREFIX, source)
}

/// The source whose cleaned table lives at `path`
pub fn cleaned_source(path: &str) -> Option<SourceKind> {
    path.strip_prefix(CLEANED_PREFIX)?.parse().ok()
}
