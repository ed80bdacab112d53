//! Per-field cleaning and validation
//!
//! Pure functions applied to every raw record. Nothing in here returns an
//! error: a field that cannot be parsed becomes an empty value, and a record
//! that cannot be validated is reported as `false` so the caller can drop it.

mod cleanup;
mod date;
mod number;
mod quote;
mod season;
mod validate;

pub use cleanup::{cleanup_data, CleanedFields};
pub use date::parse_date;
pub use number::{parse_number_or_empty, round_to, stringify, Number};
pub use quote::quote;
pub use season::{season_of, Hemisphere, Season};
pub use validate::{valid_lat_lon, valid_name, Coordinate};

/// Default number of decimal places kept for coordinates and precision
pub const DEFAULT_SIGFIGS: usize = 7;
