//! METAR retrieval from the NOAA ADDS dataserver
//!
//! Fetches the most recent METAR for a station as XML, decodes it into a
//! raw textual report, and converts that into a typed
//! [`muckwx_core::Observation`] for the describer.

pub mod client;
pub mod decode;

pub use client::*;
pub use decode::*;

use muckwx_core::ObservationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetarError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("METAR service returned status {0}")]
    Status(u16),

    #[error("Invalid METAR XML: {0}")]
    Decode(#[from] quick_xml::DeError),

    #[error("Invalid ADDS URL: {0}")]
    Url(String),

    #[error("No METAR reported for station {0}")]
    NoReport(String),

    #[error(transparent)]
    Observation(#[from] ObservationError),
}

pub type MetarResult<T> = Result<T, MetarError>;
