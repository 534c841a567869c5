use crate::core::{PriceProvider, ProviderError, validate_price};
use crate::providers::util::{get_json, usd_per_ounce_to_inr_per_gram};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// MetalPriceAPI quotes XAU as troy ounces per USD.
pub struct MetalPriceProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    usd_inr_rate: f64,
}

impl MetalPriceProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<String>, usd_inr_rate: f64) -> Self {
        MetalPriceProvider {
            name: name.to_string(),
            base_url: base_url.to_string(),
            api_key,
            usd_inr_rate,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetalPriceResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[async_trait]
impl PriceProvider for MetalPriceProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "MetalPriceFetch", skip(self), fields(provider = %self.name))]
    async fn fetch(&self, timeout: Duration) -> Result<f64, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::auth("MetalPriceAPI key not configured"))?;

        let url = format!(
            "{}/v1/latest?api_key={}&base=USD&symbols=XAU",
            self.base_url, api_key
        );
        debug!("Requesting gold price from {}/v1/latest", self.base_url);

        let data: MetalPriceResponse = get_json(&url, HeaderMap::new(), timeout).await?;
        if !data.success {
            return Err(ProviderError::malformed("MetalPriceAPI returned an error"));
        }
        let ounces_per_usd = *data
            .rates
            .get("XAU")
            .ok_or_else(|| ProviderError::malformed("No XAU rate in MetalPriceAPI response"))?;
        let ounces_per_usd = validate_price(ounces_per_usd)?;

        validate_price(usd_per_ounce_to_inr_per_gram(
            1.0 / ounces_per_usd,
            self.usd_inr_rate,
        ))
    }
}
