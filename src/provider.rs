//! HTTP client for the generation-data provider

use crate::config::ProviderConfig;
use crate::error::{GreenplugError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::reading::{GenerationDocument, GenerationSeries};
use std::time::Duration;

/// Client for the provider's published generation endpoint.
///
/// Gzip response compression is accepted opportunistically through the HTTP
/// client; an uncompressed response works just as well.
pub struct ProviderClient {
    url: String,
    http: reqwest::Client,
    logger: StructuredLogger,
}

impl ProviderClient {
    /// Create a new provider client
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            url: config.url.clone(),
            http,
            logger: get_logger("provider"),
        })
    }

    /// Fetch the current generation document and return its series
    pub async fn fetch_series(&self) -> Result<GenerationSeries> {
        self.logger.debug(&format!("Fetching {}", self.url));
        let resp = self.http.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(GreenplugError::transport(format!(
                "provider returned {}",
                resp.status()
            )));
        }
        let body = resp.text().await?;
        let doc: GenerationDocument = serde_json::from_str(&body)
            .map_err(|e| GreenplugError::malformed_reading(format!("provider payload: {}", e)))?;
        Ok(doc.data)
    }
}
