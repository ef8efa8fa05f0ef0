//! Monitoring-metric records derived from a reading
//!
//! The adapter maps a reading into the sink's record shape; actual
//! transmission happens behind the [`MetricsSink`] trait so the run can
//! treat sink failures as best-effort.

use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::reading::LatestReading;
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

/// Logical namespace the sink files records under
pub const METRICS_NAMESPACE: &str = "greenplug";

/// Balancing-authority zone attached to every record
pub const ZONE_DIMENSION: &str = "US-MT-NWE";

pub const CLEAN_ENERGY_METRIC: &str = "CleanEnergyGeneration";
pub const FUEL_ENERGY_METRIC: &str = "FuelEnergyGeneration";
pub const LOAD_METRIC: &str = "Load";

/// One metric sample in the sink's record shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRecord {
    pub name: &'static str,
    pub zone: &'static str,
    pub timestamp: DateTime<Tz>,
    pub value: u32,
}

/// Map a reading to the three published series: clean generation, fuel
/// generation and forecast load, all stamped with the reading's timestamp.
pub fn metric_records(reading: &LatestReading) -> Vec<MetricRecord> {
    let record = |name, value| MetricRecord {
        name,
        zone: ZONE_DIMENSION,
        timestamp: reading.timestamp,
        value,
    };
    vec![
        record(CLEAN_ENERGY_METRIC, reading.green_energy()),
        record(FUEL_ENERGY_METRIC, reading.dirty_energy()),
        record(LOAD_METRIC, reading.forecast_load),
    ]
}

/// External metrics sink boundary; receives one batch per invocation
#[async_trait]
pub trait MetricsSink {
    async fn put_metrics(&self, namespace: &str, records: &[MetricRecord]) -> Result<()>;
}

/// Sink that emits records as structured log events
pub struct LogMetricsSink {
    logger: StructuredLogger,
}

impl LogMetricsSink {
    pub fn new() -> Self {
        Self {
            logger: get_logger("metrics"),
        }
    }
}

impl Default for LogMetricsSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsSink for LogMetricsSink {
    async fn put_metrics(&self, namespace: &str, records: &[MetricRecord]) -> Result<()> {
        for record in records {
            self.logger.info(&format!(
                "{}/{} zone={} timestamp={} value={}",
                namespace,
                record.name,
                record.zone,
                record.timestamp.format("%m/%d/%y %H:%M %Z"),
                record.value
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::America::Denver;

    #[test]
    fn records_cover_all_three_series() {
        let reading = LatestReading {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 15, 0)
                .unwrap()
                .and_local_timezone(Denver)
                .unwrap(),
            wind_energy: 12,
            hydro_energy: 6,
            solar_energy: 4,
            thermal_energy: 22,
            total_generation: 42,
            forecast_load: 44,
        };

        let records = metric_records(&reading);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, CLEAN_ENERGY_METRIC);
        assert_eq!(records[0].value, 22);
        assert_eq!(records[1].name, FUEL_ENERGY_METRIC);
        assert_eq!(records[1].value, 22);
        assert_eq!(records[2].name, LOAD_METRIC);
        assert_eq!(records[2].value, 44);
        assert!(records.iter().all(|r| r.zone == ZONE_DIMENSION));
        assert!(records.iter().all(|r| r.timestamp == reading.timestamp));
    }
}
