//! Hemisphere and season derivation
//!
//! Seasons are meteorological quarters starting in November, mapped onto
//! the hemisphere of the observation. The final value is a numeric code
//! 0-7: northern seasons first, then southern.

use super::number::parse_number_or_empty;
use super::validate::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Positive latitudes are northern; the equator counts as southern.
    pub fn of(lat: f64) -> Self {
        if lat > 0.0 {
            Self::North
        } else {
            Self::South
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

/// Quarter index by calendar month; index 0 is unused.
const MONTH_QUARTER: [usize; 13] = [0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 0, 0];

const NORTH_SEASONS: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];
const SOUTH_SEASONS: [Season; 4] = [Season::Summer, Season::Fall, Season::Winter, Season::Spring];

/// Numeric code of a (hemisphere, season) pair.
const fn season_code(hemisphere: Hemisphere, season: Season) -> u8 {
    match (hemisphere, season) {
        (Hemisphere::North, Season::Winter) => 0,
        (Hemisphere::North, Season::Spring) => 1,
        (Hemisphere::North, Season::Summer) => 2,
        (Hemisphere::North, Season::Fall) => 3,
        (Hemisphere::South, Season::Winter) => 4,
        (Hemisphere::South, Season::Spring) => 5,
        (Hemisphere::South, Season::Summer) => 6,
        (Hemisphere::South, Season::Fall) => 7,
    }
}

/// Season code for an observation at `lat` in `month`.
///
/// Empty when the month is empty or not a calendar month, or when the
/// latitude cannot be read.
pub fn season_of(lat: impl Coordinate, month: &str) -> String {
    let Some(month) = parse_month(month) else {
        return String::new();
    };
    let Some(lat) = lat.degrees() else {
        return String::new();
    };

    let hemisphere = Hemisphere::of(lat);
    let quarter = MONTH_QUARTER[month];
    let season = match hemisphere {
        Hemisphere::North => NORTH_SEASONS[quarter],
        Hemisphere::South => SOUTH_SEASONS[quarter],
    };
    season_code(hemisphere, season).to_string()
}

fn parse_month(month: &str) -> Option<usize> {
    let value = parse_number_or_empty(month)?.value();
    if value.fract() != 0.0 || !(1.0..=12.0).contains(&value) {
        return None;
    }
    Some(value as usize)
}
