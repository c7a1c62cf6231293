//! HTTP client for the endpoint that serves raw activity records.

use crate::utils::config::DEFAULT_FETCH_TIMEOUT;
use crate::utils::error::SourceError;
use log::{debug, info};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Client fetching one raw event batch per call
pub struct EventClient {
    client: Client,
    url: String,
}

impl EventClient {
    /// Create a new client with the default timeout
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_timeout(url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a client with a custom timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::RequestFailed)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw batch as JSON
    ///
    /// # Errors
    /// * `SourceError::RequestFailed` - Connection or timeout failure
    /// * `SourceError::InvalidResponse` - Non-2xx status
    /// * `SourceError::JsonError` - Body is not JSON
    pub fn fetch(&self) -> Result<Value, SourceError> {
        self.fetch_with_query(&[])
    }

    /// Fetch with extra query parameters (e.g. `month=2024-03`)
    pub fn fetch_with_query(&self, query: &[(&str, &str)]) -> Result<Value, SourceError> {
        info!("Fetching events from: {}", self.url);
        debug!("Query parameters: {:?}", query);

        let response = self
            .client
            .get(&self.url)
            .query(query)
            .send()
            .map_err(SourceError::RequestFailed)?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        let body = response.text().map_err(SourceError::RequestFailed)?;
        let value: Value = serde_json::from_str(&body)?;

        debug!("Fetched {} bytes", body.len());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_url() {
        let client = EventClient::new("http://localhost:3000/api/labels").unwrap();
        assert_eq!(client.url(), "http://localhost:3000/api/labels");
    }

    #[test]
    fn test_unreachable_endpoint_is_request_error() {
        let client =
            EventClient::with_timeout("http://127.0.0.1:9/events", Duration::from_millis(200))
                .unwrap();
        assert!(matches!(client.fetch(), Err(SourceError::RequestFailed(_))));
    }
}
