use crate::core::error::ProviderError;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Converts a USD per troy ounce quote into INR per gram.
pub fn usd_per_ounce_to_inr_per_gram(usd_per_ounce: f64, usd_inr_rate: f64) -> f64 {
    usd_per_ounce / GRAMS_PER_TROY_OUNCE * usd_inr_rate
}

/// Sends a GET request and decodes the JSON body.
///
/// # Parameters
/// - `url`: Full request URL, query string included
/// - `headers`: Extra headers, e.g. access tokens
/// - `timeout`: Upper bound for the whole request
///
/// # Returns
/// The decoded body, or a [`ProviderError`] classifying the failure
pub async fn get_json<T: DeserializeOwned>(
    url: &str,
    headers: HeaderMap,
    timeout: Duration,
) -> Result<T, ProviderError> {
    let client = reqwest::Client::builder()
        .user_agent("gold-sip/0.1")
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::network(format!("Failed to build client: {e}")))?;

    let response = client.get(url).headers(headers).send().await?;
    let status = response.status();
    debug!(%status, "Received provider response");

    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(ProviderError::auth(format!("HTTP error: {status}")));
    }
    if !status.is_success() {
        return Err(ProviderError::network(format!("HTTP error: {status}")));
    }

    let text = response.text().await?;
    if text.trim().is_empty() {
        return Err(ProviderError::malformed("Received empty response"));
    }
    serde_json::from_str(&text).map_err(|e| {
        ProviderError::malformed(format!(
            "Failed to parse JSON response: {e}. Response: '{text}'"
        ))
    })
}
