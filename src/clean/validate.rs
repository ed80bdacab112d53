//! Record-level validity checks

use super::number::{parse_number_or_empty, Number};

/// A value that can be read as a coordinate in decimal degrees.
///
/// Implemented for raw text and for already-numeric values so the same
/// checks apply before and after cleaning.
pub trait Coordinate {
    fn degrees(&self) -> Option<f64>;
}

impl Coordinate for &str {
    fn degrees(&self) -> Option<f64> {
        parse_number_or_empty(self).map(|n| n.value())
    }
}

impl Coordinate for &String {
    fn degrees(&self) -> Option<f64> {
        self.as_str().degrees()
    }
}

impl Coordinate for String {
    fn degrees(&self) -> Option<f64> {
        self.as_str().degrees()
    }
}

impl Coordinate for f64 {
    fn degrees(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl Coordinate for Number {
    fn degrees(&self) -> Option<f64> {
        self.value().degrees()
    }
}

impl Coordinate for Option<Number> {
    fn degrees(&self) -> Option<f64> {
        self.and_then(|n| n.degrees())
    }
}

/// True when both values parse and fall inside `[-90, 90]` × `[-180, 180]`.
pub fn valid_lat_lon(lat: impl Coordinate, lon: impl Coordinate) -> bool {
    match (lat.degrees(), lon.degrees()) {
        (Some(lat), Some(lon)) => (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon),
        _ => false,
    }
}

/// True when the name is present, non-empty, and free of double quotes.
pub fn valid_name(name: Option<&str>) -> bool {
    match name {
        Some(name) => !name.is_empty() && !name.contains('"'),
        None => false,
    }
}
