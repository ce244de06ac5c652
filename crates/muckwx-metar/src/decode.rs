//! ADDS XML decoding and conversion to a typed observation

use chrono::{DateTime, Utc};
use muckwx_core::{
    parse_or_default, parse_required, Observation, ObservationError, SkyCover,
};
use serde::Deserialize;

use crate::MetarResult;

/// The dataserver response envelope; everything outside `<data>` is noise
#[derive(Debug, Deserialize)]
struct AddsResponse {
    data: Option<AddsData>,
}

#[derive(Debug, Deserialize)]
struct AddsData {
    #[serde(rename = "METAR", default)]
    metars: Vec<RawMetar>,
}

/// One `<METAR>` element, fields kept textual exactly as reported.
///
/// Numbers stay strings here so conversion errors can name the field and
/// echo the offending text instead of vanishing inside the XML decoder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMetar {
    pub raw_text: Option<String>,
    pub station_id: Option<String>,
    pub observation_time: Option<String>,
    pub temp_c: Option<String>,
    pub dewpoint_c: Option<String>,
    pub wind_dir_degrees: Option<String>,
    pub wind_speed_kt: Option<String>,
    pub wind_gust_kt: Option<String>,
    pub visibility_statute_mi: Option<String>,
    pub altim_in_hg: Option<String>,
    pub precip_in: Option<String>,
    pub snow_in: Option<String>,
    #[serde(rename = "sky_condition", default)]
    pub sky_condition: Vec<SkyCondition>,
}

/// A `<sky_condition>` layer; coverage and base are attributes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkyCondition {
    #[serde(rename = "@sky_cover")]
    pub sky_cover: Option<String>,
    #[serde(rename = "@cloud_base_ft_agl")]
    pub cloud_base_ft_agl: Option<String>,
}

impl RawMetar {
    /// Observation timestamp, when the report carries a parseable one
    pub fn observation_time(&self) -> Option<DateTime<Utc>> {
        let text = self.observation_time.as_deref()?;
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert the textual report into a typed observation.
    ///
    /// Required fields must be present and parseable; optional fields
    /// default only when absent. Stations report cloud layers lowest
    /// first and the last layer is the one kept.
    pub fn to_observation(&self) -> Result<Observation, ObservationError> {
        let temperature_c = parse_required("temp_c", self.temp_c.as_deref())?;
        let dew_point_c = parse_required("dewpoint_c", self.dewpoint_c.as_deref())?;
        let wind_direction_deg =
            parse_required("wind_dir_degrees", self.wind_dir_degrees.as_deref())?;
        let wind_speed_kt = parse_required("wind_speed_kt", self.wind_speed_kt.as_deref())?;
        let wind_gust_kt = parse_or_default("wind_gust_kt", self.wind_gust_kt.as_deref(), 0)?;
        let visibility_mi = parse_or_default(
            "visibility_statute_mi",
            self.visibility_statute_mi.as_deref(),
            Observation::DEFAULT_VISIBILITY_MI,
        )?;

        let sky_cover = self
            .sky_condition
            .last()
            .and_then(|layer| layer.sky_cover.as_deref())
            .map(SkyCover::from_code)
            .ok_or(ObservationError::MissingField("sky_condition"))?;

        Ok(Observation {
            temperature_c,
            dew_point_c,
            wind_direction_deg,
            wind_speed_kt,
            wind_gust_kt,
            visibility_mi,
            sky_cover,
        })
    }
}

/// Decode a dataserver response body into its METAR reports
pub fn decode(xml: &str) -> MetarResult<Vec<RawMetar>> {
    let response: AddsResponse = quick_xml::de::from_str(xml)?;
    Ok(response.data.map(|d| d.metars).unwrap_or_default())
}
