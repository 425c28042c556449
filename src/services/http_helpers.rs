use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::errors::{ClientError, ClientResult};

const MAX_ERROR_BODY: usize = 200;

/// Joins the configured base URL and an endpoint path.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pulls a human readable message out of an error response body.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }

    trimmed.chars().take(MAX_ERROR_BODY).collect()
}

/// Decodes a success body. An empty body decodes as JSON `null`, which lets
/// callers ask for `()` or `Option<T>` on 204 responses.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ClientError::DecodeError(e.to_string()))
}
