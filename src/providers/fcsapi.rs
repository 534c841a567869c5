use crate::core::{PriceProvider, ProviderError, validate_price};

/// Confidence attached to FCS API prices, a notch below the spot metal APIs.
pub const FCS_CONFIDENCE: f64 = 0.90;
use crate::providers::util::{get_json, usd_per_ounce_to_inr_per_gram};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct FcsApiProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    usd_inr_rate: f64,
}

impl FcsApiProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<String>, usd_inr_rate: f64) -> Self {
        FcsApiProvider {
            name: name.to_string(),
            base_url: base_url.to_string(),
            api_key,
            usd_inr_rate,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FcsResponse {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    response: Vec<FcsQuote>,
}

#[derive(Debug, Deserialize)]
struct FcsQuote {
    /// Close price, USD per troy ounce
    c: NumberOrString,
}

// FCS returns prices as strings on some plans.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn to_f64(&self) -> Result<f64, ProviderError> {
        match self {
            NumberOrString::Number(n) => Ok(*n),
            NumberOrString::Text(s) => s
                .trim()
                .replace(',', "")
                .parse()
                .map_err(|e| ProviderError::malformed(format!("Unparseable price '{s}': {e}"))),
        }
    }
}

#[async_trait]
impl PriceProvider for FcsApiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn confidence(&self) -> f64 {
        FCS_CONFIDENCE
    }

    #[instrument(name = "FcsApiFetch", skip(self), fields(provider = %self.name))]
    async fn fetch(&self, timeout: Duration) -> Result<f64, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::auth("FCS API key not configured"))?;

        let url = format!(
            "{}/api-v3/forex/latest?symbol=XAU/USD&access_key={}",
            self.base_url, api_key
        );
        debug!("Requesting gold price from {}/api-v3/forex/latest", self.base_url);

        let data: FcsResponse = get_json(&url, HeaderMap::new(), timeout).await?;
        if !data.status {
            return Err(ProviderError::malformed("FCS API returned an error"));
        }
        let quote = data
            .response
            .first()
            .ok_or_else(|| ProviderError::malformed("No XAU/USD quote in FCS API response"))?;

        let usd_per_ounce = validate_price(quote.c.to_f64()?)?;
        validate_price(usd_per_ounce_to_inr_per_gram(usd_per_ounce, self.usd_inr_rate))
    }
}
