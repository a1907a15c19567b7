use crate::domain::model::RawResponse;
use crate::utils::error::{ProbeError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// One GET per endpoint through a shared connection-reusing client. No
/// retries; every failure mode surfaces as an error carrying the URL.
pub struct EndpointFetcher {
    client: Client,
    timeout: Duration,
}

impl EndpointFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<RawResponse> {
        let parsed = Url::parse(url).map_err(|e| ProbeError::InvalidUrlError {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("📡 Making request to: {}", url);

        let response = self
            .client
            .get(parsed)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ProbeError::FetchError {
                url: url.to_string(),
                source,
            })?;

        tracing::debug!("📡 Response status from {}: {}", url, response.status());

        if !response.status().is_success() {
            return Err(ProbeError::StatusError {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|source| ProbeError::FetchError {
                    url: url.to_string(),
                    source,
                })?;

        match body {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(ProbeError::PayloadError {
                url: url.to_string(),
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
