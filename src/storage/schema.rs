//! Versioned table schemas and typed row conversion

use super::traits::StorageResult;
use serde::{Deserialize, Serialize};

/// Ordered, named field list of a materialized table.
///
/// Two schemas are compatible only if name, version, and every field match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub version: u32,
    pub fields: Vec<String>,
}

impl TableSchema {
    pub fn new(
        name: impl Into<String>,
        version: u32,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

impl std::fmt::Display for TableSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@v{}({})", self.name, self.version, self.fields.join(","))
    }
}

/// A typed row that can be stored as an ordered field tuple.
///
/// `Layout` selects between schema variants of the same row type (for
/// example one per source); fixed tables use `()`.
pub trait Tabular: Sized {
    type Layout: Copy;

    fn schema(layout: Self::Layout) -> TableSchema;

    fn to_fields(&self) -> Vec<String>;

    fn from_fields(layout: Self::Layout, fields: Vec<String>) -> StorageResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_display_lists_fields() {
        let schema = TableSchema::new("location", 1, ["loc_id", "lat", "lon"]);
        assert_eq!(schema.width(), 3);
        assert_eq!(schema.to_string(), "location@v1(loc_id,lat,lon)");
    }

    #[test]
    fn schemas_compare_on_every_part() {
        let a = TableSchema::new("location", 1, ["loc_id", "lat", "lon"]);
        assert_eq!(a, TableSchema::new("location", 1, vec!["loc_id".to_string(), "lat".into(), "lon".into()]));
        assert_ne!(a, TableSchema::new("location", 2, ["loc_id", "lat", "lon"]));
        assert_ne!(a, TableSchema::new("location", 1, ["loc_id", "lon", "lat"]));
    }
}
