use crate::core::{PriceProvider, ProviderError, validate_price};
use crate::providers::util::{get_json, usd_per_ounce_to_inr_per_gram};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct GoldApiProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    usd_inr_rate: f64,
}

impl GoldApiProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<String>, usd_inr_rate: f64) -> Self {
        GoldApiProvider {
            name: name.to_string(),
            base_url: base_url.to_string(),
            api_key,
            usd_inr_rate,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoldApiResponse {
    /// USD per troy ounce
    price: f64,
}

#[async_trait]
impl PriceProvider for GoldApiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "GoldApiFetch", skip(self), fields(provider = %self.name))]
    async fn fetch(&self, timeout: Duration) -> Result<f64, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::auth("GoldAPI key not configured"))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-access-token",
            HeaderValue::from_str(api_key)
                .map_err(|e| ProviderError::auth(format!("Invalid GoldAPI key: {e}")))?,
        );

        let url = format!("{}/api/XAU/USD", self.base_url);
        debug!("Requesting gold price from {}", url);

        let data: GoldApiResponse = get_json(&url, headers, timeout).await?;
        let usd_per_ounce = validate_price(data.price)?;
        validate_price(usd_per_ounce_to_inr_per_gram(usd_per_ounce, self.usd_inr_rate))
    }
}
