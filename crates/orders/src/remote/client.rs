//! HTTP implementation of [`OrderSource`].

use std::time::Duration;

use petcare_core::{Email, Order};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::payload::{HealthResponse, parse_orders_response};
use super::{OrderSource, RemoteError};
use crate::config::SyncConfig;

/// Backend order API client.
///
/// Every request carries the client-wide timeout, so a hung backend delays
/// a refresh by at most that long.
#[derive(Debug, Clone)]
pub struct HttpOrderSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpOrderSource {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidUrl` if `base_url` cannot take path
    /// segments, or `RemoteError::Client` if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, RemoteError> {
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteError::Client)?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the API URL and timeout in `config`.
    ///
    /// # Errors
    ///
    /// See [`HttpOrderSource::new`].
    pub fn from_config(config: &SyncConfig) -> Result<Self, RemoteError> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    /// The API root.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` with `segments` appended, each percent-encoded as a
    /// single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl OrderSource for HttpOrderSource {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn health(&self) -> Result<bool, RemoteError> {
        let url = self.endpoint(&["health"])?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body: HealthResponse = response.json().await?;
        debug!(database = ?body.database, "Health check answered");
        Ok(body.is_healthy())
    }

    #[instrument(skip(self, email), fields(base_url = %self.base_url))]
    async fn fetch_orders(&self, email: &Email) -> Result<Vec<Order>, RemoteError> {
        let url = self.endpoint(&["orders", "user", email.as_str()])?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body: Value = response.json().await?;
        let orders = parse_orders_response(body);
        debug!(count = orders.len(), "Fetched remote orders");
        Ok(orders)
    }
}
