//! Smart-switch webhook client and the reconciliation protocol
//!
//! The reconciler reads the switch's current state fresh on every run,
//! compares it to the verdict and issues at most one state-change call.
//! An unreadable current state is a hard stop: no write is ever issued on
//! a guessed state.

use crate::config::SequematicConfig;
use crate::error::{GreenplugError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::policy::Verdict;
use async_trait::async_trait;
use std::time::Duration;

/// External switch endpoint boundary
#[async_trait]
pub trait SwitchEndpoint {
    /// Read the current on/off state
    async fn current_state(&self) -> Result<bool>;

    /// Write the desired on/off state
    async fn set_state(&self, on: bool) -> Result<()>;

    /// Publish the green percentage to the informational value variable
    async fn publish_value(&self, percent: u32) -> Result<()>;
}

/// Sequematic webhook client
///
/// State lives in a Sequematic variable: `variable-get/<suffix>` returns a
/// numeric string and `variable-change/<suffix>/=<value>` assigns it.
pub struct SequematicClient {
    base_url: String,
    switch_suffix: String,
    value_suffix: Option<String>,
    http: reqwest::Client,
    logger: StructuredLogger,
}

impl SequematicClient {
    /// Create a new Sequematic client
    pub fn new(config: &SequematicConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            switch_suffix: config.switch_url_suffix.clone(),
            value_suffix: config.value_url_suffix.clone(),
            http,
            logger: get_logger("sequematic"),
        })
    }
}

#[async_trait]
impl SwitchEndpoint for SequematicClient {
    async fn current_state(&self) -> Result<bool> {
        let url = format!("{}/variable-get/{}", self.base_url, self.switch_suffix);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(GreenplugError::transport(format!(
                "switch state read returned {}",
                resp.status()
            )));
        }
        let body = resp.text().await?;
        let value: i64 = body.trim().parse().map_err(|_| {
            GreenplugError::transport(format!(
                "switch state body {:?} is not numeric",
                body.trim()
            ))
        })?;
        Ok(value != 0)
    }

    async fn set_state(&self, on: bool) -> Result<()> {
        let url = format!(
            "{}/variable-change/{}/={}",
            self.base_url,
            self.switch_suffix,
            if on { 1 } else { 0 }
        );
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(GreenplugError::transport(format!(
                "switch state change returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn publish_value(&self, percent: u32) -> Result<()> {
        let Some(suffix) = &self.value_suffix else {
            self.logger.debug("No value variable configured");
            return Ok(());
        };
        let url = format!("{}/variable-change/{}/={}", self.base_url, suffix, percent);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(GreenplugError::transport(format!(
                "value update returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Observed state already matched the verdict; no write issued
    InSync { on: bool },
    /// One state-change call was issued and confirmed
    Changed { on: bool },
    /// The state-change call failed; logged, not retried
    ChangeFailed { desired_on: bool },
}

/// Reconcile the external switch with the verdict.
///
/// Issues at most one write per invocation. Failure to read the current
/// state aborts with a transport error before any write is attempted; a
/// failed write is reported as [`ReconcileOutcome::ChangeFailed`] without
/// invalidating the successful read.
pub async fn reconcile<E: SwitchEndpoint + ?Sized>(
    endpoint: &E,
    verdict: &Verdict,
) -> Result<ReconcileOutcome> {
    let logger = get_logger("switch");

    let observed = match endpoint.current_state().await {
        Ok(state) => state,
        Err(e) => {
            logger.error("Unable to get switch status");
            return Err(GreenplugError::transport(format!(
                "unable to determine current switch state: {}",
                e
            )));
        }
    };
    logger.info(if observed {
        "Switch is currently ON"
    } else {
        "Switch is currently OFF"
    });

    if observed == verdict.switch_should_be_on {
        logger.info("Nothing to do");
        return Ok(ReconcileOutcome::InSync { on: observed });
    }

    let desired = verdict.switch_should_be_on;
    logger.info(if desired {
        "Turning switch ON"
    } else {
        "Turning switch OFF"
    });
    match endpoint.set_state(desired).await {
        Ok(()) => {
            logger.info("Successfully notified switch webhook");
            Ok(ReconcileOutcome::Changed { on: desired })
        }
        Err(e) => {
            logger.error(&format!("Switch state change failed: {}", e));
            Ok(ReconcileOutcome::ChangeFailed { desired_on: desired })
        }
    }
}
