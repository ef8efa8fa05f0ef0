//! Parsing of the provider's electricity-generation time series
//!
//! The provider publishes a JSON document whose `Data` object carries one
//! comma-delimited string of historical values per field. This module turns
//! that payload into the single most recent, internally consistent reading.

use crate::error::{GreenplugError, Result};
use chrono::{DateTime, NaiveDateTime};
use chrono_tz::America::Denver;
use chrono_tz::Tz;
use serde::Deserialize;

/// Wall-clock format of the provider's read-date tokens
pub const READ_DATE_FORMAT: &str = "%m/%d/%y %H:%M";

/// Top-level provider document
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationDocument {
    #[serde(rename = "Data")]
    pub data: GenerationSeries,
}

/// The seven comma-delimited series published by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationSeries {
    #[serde(rename = "LblReadDate")]
    pub read_date: String,

    #[serde(rename = "LblWindData")]
    pub wind: String,

    #[serde(rename = "LblHydroData")]
    pub hydro: String,

    #[serde(rename = "LblThermData")]
    pub thermal: String,

    #[serde(rename = "LblSolarData")]
    pub solar: String,

    #[serde(rename = "LblForecastData")]
    pub forecast_load: String,

    #[serde(rename = "LblTotalData")]
    pub total_generation: String,
}

/// The most recent reading, with every value taken from the same index
/// position across all seven series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestReading {
    /// Sample time in the utility's operating zone (America/Denver)
    pub timestamp: DateTime<Tz>,
    pub wind_energy: u32,
    pub hydro_energy: u32,
    pub solar_energy: u32,
    pub thermal_energy: u32,
    pub total_generation: u32,
    pub forecast_load: u32,
}

impl LatestReading {
    /// Wind + hydro + solar generation
    pub fn green_energy(&self) -> u32 {
        self.wind_energy + self.hydro_energy + self.solar_energy
    }

    /// Thermal (fuel) generation
    pub fn dirty_energy(&self) -> u32 {
        self.thermal_energy
    }
}

/// Split a series into tokens, dropping the provider's trailing comma
fn tokens(raw: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = raw.split(',').collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }
    parts
}

fn numeric_at(raw: &str, field: &str, index: usize) -> Result<u32> {
    let parts = tokens(raw);
    let token = parts.get(index).ok_or_else(|| {
        GreenplugError::malformed_reading(format!(
            "{} has {} values, expected at least {}",
            field,
            parts.len(),
            index + 1
        ))
    })?;
    token.trim().parse::<u32>().map_err(|_| {
        GreenplugError::malformed_reading(format!(
            "{} value {:?} at index {} is not a non-negative integer",
            field, token, index
        ))
    })
}

/// Assemble the most recent reading from the provider series.
///
/// The reference index is the last position of the read-date series; every
/// other series is read at that same index so one reading never mixes values
/// sampled at different timestamps. A series too short to cover the reference
/// index fails with a malformed-reading error rather than silently indexing
/// its own last element.
pub fn latest_reading(series: &GenerationSeries) -> Result<LatestReading> {
    let dates = tokens(&series.read_date);
    let Some(date_token) = dates.last() else {
        return Err(GreenplugError::malformed_reading(
            "LblReadDate series is empty",
        ));
    };
    let index = dates.len() - 1;

    let naive = NaiveDateTime::parse_from_str(date_token.trim(), READ_DATE_FORMAT)?;
    let timestamp = naive.and_local_timezone(Denver).earliest().ok_or_else(|| {
        GreenplugError::malformed_reading(format!(
            "read date {} does not exist in America/Denver",
            date_token
        ))
    })?;

    Ok(LatestReading {
        timestamp,
        wind_energy: numeric_at(&series.wind, "LblWindData", index)?,
        hydro_energy: numeric_at(&series.hydro, "LblHydroData", index)?,
        solar_energy: numeric_at(&series.solar, "LblSolarData", index)?,
        thermal_energy: numeric_at(&series.thermal, "LblThermData", index)?,
        total_generation: numeric_at(&series.total_generation, "LblTotalData", index)?,
        forecast_load: numeric_at(&series.forecast_load, "LblForecastData", index)?,
    })
}
