//! Typed weather observation assembled from a METAR report

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sky coverage category from the report's sky_condition layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyCover {
    Clear,
    Few,
    Scattered,
    Broken,
    Overcast,
    /// Any cover code we don't recognize; described by silence, not error
    Unknown,
}

impl SkyCover {
    /// Map an ADDS sky_cover code to a category
    pub fn from_code(code: &str) -> Self {
        match code {
            "CLR" | "SKC" => SkyCover::Clear,
            "FEW" => SkyCover::Few,
            "SCT" => SkyCover::Scattered,
            "BKN" => SkyCover::Broken,
            "OVC" => SkyCover::Overcast,
            _ => SkyCover::Unknown,
        }
    }
}

/// Error converting raw report fields into an [`Observation`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObservationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} has unparseable value {value:?}")]
    InvalidValue { field: &'static str, value: String },
}

/// A single weather observation, fully typed and defaulted
///
/// Optional report fields receive their defaults here, at construction,
/// so the describer never has to ask whether a field was reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Air temperature in degrees celsius
    pub temperature_c: f64,

    /// Dew point in degrees celsius
    pub dew_point_c: f64,

    /// Wind direction in degrees; 0 means calm or variable depending on speed.
    /// Values of 340 and above all read as northerly, so out-of-range input
    /// degrades the same way a 350-degree wind does.
    pub wind_direction_deg: u16,

    /// Sustained wind speed in knots
    pub wind_speed_kt: u32,

    /// Peak gust in knots; 0 when the report carries no gust field
    pub wind_gust_kt: u32,

    /// Visibility in statute miles; unlimited (10.0) when not reported
    pub visibility_mi: f64,

    /// Reported cloud coverage
    pub sky_cover: SkyCover,
}

impl Observation {
    /// Visibility used when the report omits visibility_statute_mi
    pub const DEFAULT_VISIBILITY_MI: f64 = 10.0;
}

/// Parse a required textual field into its typed value
pub fn parse_required<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<T, ObservationError> {
    let text = raw.ok_or(ObservationError::MissingField(field))?;
    text.trim().parse().map_err(|_| ObservationError::InvalidValue {
        field,
        value: text.to_string(),
    })
}

/// Parse an optional textual field, defaulting only when it is absent.
/// Garbage text in an optional field is still an error.
pub fn parse_or_default<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
    default: T,
) -> Result<T, ObservationError> {
    match raw {
        Some(text) => text.trim().parse().map_err(|_| ObservationError::InvalidValue {
            field,
            value: text.to_string(),
        }),
        None => Ok(default),
    }
}
