// Plumbing shared by the model and bucket clients

use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{DialError, Result};

pub(crate) const API_KEY_HEADER: &str = "api-key";

/// Header value for the gateway key, hidden from `Debug` output
pub(crate) fn api_key_header(api_key: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(api_key)
        .map_err(|_| DialError::Config("Invalid API key format".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Build an HTTP client without credentials
///
/// The key is attached per request so that it only ever reaches the gateway.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DialError::Config(format!("Failed to create HTTP client: {e}")))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turn a non-2xx reply into a `Gateway` error, preferring the structured message
pub(crate) fn gateway_error(status: StatusCode, body: &str, endpoint: &str) -> DialError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                trimmed.to_string()
            }
        });

    DialError::Gateway {
        status: status.as_u16(),
        message,
        endpoint: endpoint.to_string(),
    }
}
