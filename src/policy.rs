//! Decision policy mapping a reading to a switch verdict
//!
//! Pure and deterministic; no I/O happens here.

use crate::error::{GreenplugError, Result};
use crate::reading::LatestReading;
use serde::{Deserialize, Serialize};

/// Gating rule for the switch-on decision.
///
/// The surplus variant additionally requires total generation to exceed the
/// forecast load, so the switch only turns on while the grid produces more
/// than it expects to consume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatingPolicy {
    #[default]
    Threshold,
    ThresholdAndSurplus,
}

/// Outcome of the decision policy for one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Green generation as a percentage of forecast load, rounded half away
    /// from zero. May exceed 100 when generation outpaces the forecast.
    pub green_energy_percent: u32,
    pub switch_should_be_on: bool,
}

/// Derive the switch verdict from a reading and the configured threshold.
///
/// The threshold is inclusive: a green percentage exactly at the threshold
/// turns the switch on. A zero forecast load is rejected as an invalid
/// reading before any arithmetic.
pub fn decide(
    reading: &LatestReading,
    threshold_percent: u8,
    gating: GatingPolicy,
) -> Result<Verdict> {
    if reading.forecast_load == 0 {
        return Err(GreenplugError::invalid_reading("forecast load is zero"));
    }

    let green_energy = reading.green_energy();
    let green_energy_percent =
        ((f64::from(green_energy) / f64::from(reading.forecast_load)) * 100.0).round() as u32;

    let mut switch_should_be_on = green_energy_percent >= u32::from(threshold_percent);
    if gating == GatingPolicy::ThresholdAndSurplus {
        switch_should_be_on =
            switch_should_be_on && reading.total_generation > reading.forecast_load;
    }

    Ok(Verdict {
        green_energy_percent,
        switch_should_be_on,
    })
}
