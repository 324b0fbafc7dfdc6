//! Shared HTTP plumbing for the REST-backed providers.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{ProviderError, ProviderResult};

/// Upper bound on how much of an upstream error body is kept in a message.
const MAX_ERROR_BODY: usize = 512;

/// Builds the HTTP client used by a provider.
pub(crate) fn build_client(timeout: Duration) -> ProviderResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cutoday/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            ProviderError::configuration_missing(format!("failed to create HTTP client: {}", e))
                .with_source(e)
        })
}

/// Sends a request, mapping transport failures and error statuses to
/// [`ProviderError`]s.
pub(crate) async fn send(request: reqwest::RequestBuilder) -> ProviderResult<reqwest::Response> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::source_unavailable("request timeout")
        } else if e.is_connect() {
            ProviderError::source_unavailable(format!("connection failed: {}", e))
        } else {
            ProviderError::source_unavailable(format!("request failed: {}", e))
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = truncate(body.trim());
    warn!(status = status.as_u16(), body = %body, "upstream returned an error");

    let message = if body.is_empty() {
        format!("API error ({})", status)
    } else {
        format!("API error ({}): {}", status, body)
    };
    Err(ProviderError::upstream(status.as_u16(), message))
}

/// Reads and parses a JSON response body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ProviderResult<T> {
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::source_unavailable(format!("failed to read response: {}", e)))?;

    serde_json::from_str(&body).map_err(|e| {
        ProviderError::source_unavailable(format!("failed to parse response: {}", e)).with_source(e)
    })
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
