//! One-run orchestration: fetch, parse, decide, emit, reconcile

use crate::config::Config;
use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::metrics::{LogMetricsSink, METRICS_NAMESPACE, MetricsSink, metric_records};
use crate::policy::decide;
use crate::provider::ProviderClient;
use crate::reading::latest_reading;
use crate::switch::{ReconcileOutcome, SequematicClient, SwitchEndpoint, reconcile};

/// Single-run controller
///
/// Each run is independent and stateless apart from the configuration
/// captured at construction. The switch endpoint and metrics sink are
/// generic so tests can substitute in-memory fakes.
pub struct Controller<E: SwitchEndpoint, M: MetricsSink> {
    config: Config,
    provider: ProviderClient,
    switch: E,
    metrics: M,
    logger: StructuredLogger,
}

impl Controller<SequematicClient, LogMetricsSink> {
    /// Build a controller with the real collaborators from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let provider = ProviderClient::new(&config.provider)?;
        let switch = SequematicClient::new(&config.sequematic)?;
        Ok(Self::new(config, provider, switch, LogMetricsSink::new()))
    }
}

impl<E: SwitchEndpoint, M: MetricsSink> Controller<E, M> {
    /// Assemble a controller from explicit collaborators
    pub fn new(config: Config, provider: ProviderClient, switch: E, metrics: M) -> Self {
        Self {
            config,
            provider,
            switch,
            metrics,
            logger: get_logger("controller"),
        }
    }

    /// Perform one full sample-decide-reconcile pass.
    ///
    /// Metrics emission and the optional green-percent value publish are
    /// best-effort; only an unusable reading or an unreadable switch state
    /// fails the run.
    pub async fn run_once(&self) -> Result<ReconcileOutcome> {
        let series = self.provider.fetch_series().await?;
        let reading = latest_reading(&series)?;

        self.logger.info(&format!(
            "Date: {}",
            reading.timestamp.format("%m/%d/%y %H:%M %Z")
        ));
        self.logger.info(&format!("Green: {}", reading.green_energy()));
        self.logger.info(&format!("Dirty: {}", reading.dirty_energy()));
        self.logger
            .info(&format!("Consumption: {}", reading.forecast_load));

        let verdict = decide(
            &reading,
            self.config.policy.green_energy_threshold,
            self.config.policy.gating,
        )?;
        self.logger.info(&format!(
            "Green Pct Consumption: {}%",
            verdict.green_energy_percent
        ));
        self.logger.info(&format!(
            "Green Energy Threshold: {}%",
            self.config.policy.green_energy_threshold
        ));
        self.logger.info(if verdict.switch_should_be_on {
            "Recommend switch ON"
        } else {
            "Recommend switch OFF"
        });

        let records = metric_records(&reading);
        if let Err(e) = self.metrics.put_metrics(METRICS_NAMESPACE, &records).await {
            self.logger
                .warn(&format!("Metrics sink failure (continuing): {}", e));
        }

        if self.config.sequematic.value_url_suffix.is_some() {
            match self
                .switch
                .publish_value(verdict.green_energy_percent)
                .await
            {
                Ok(()) => self
                    .logger
                    .info("Successfully updated green energy value variable"),
                Err(e) => self
                    .logger
                    .warn(&format!("Green energy value update failed (continuing): {}", e)),
            }
        }

        reconcile(&self.switch, &verdict).await
    }
}
