//! Pricing abstractions and core types

use crate::core::error::ProviderError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;

/// Confidence in a price fetched from a provider moments ago.
pub const PROVIDER_CONFIDENCE: f64 = 0.95;
/// Confidence in the configured mock price.
pub const MOCK_CONFIDENCE: f64 = 0.50;
/// Confidence in an expired cached price served during an outage.
pub const STALE_CONFIDENCE: f64 = 0.30;

/// Where a quote came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteSource {
    Provider(String),
    Cache,
    Mock,
}

impl Display for QuoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteSource::Provider(name) => write!(f, "{name}"),
            QuoteSource::Cache => write!(f, "Cache"),
            QuoteSource::Mock => write!(f, "Mock"),
        }
    }
}

impl QuoteSource {
    /// Confidence a fresh quote from this source starts with. Cached quotes
    /// originate at a provider.
    pub fn default_confidence(&self) -> f64 {
        match self {
            QuoteSource::Provider(_) | QuoteSource::Cache => PROVIDER_CONFIDENCE,
            QuoteSource::Mock => MOCK_CONFIDENCE,
        }
    }
}

fn default_confidence() -> f64 {
    PROVIDER_CONFIDENCE
}

/// Gold price in INR per gram at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    pub source: QuoteSource,
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub is_stale: bool,
    /// How far the price can be trusted, from 0 to 1.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl PriceQuote {
    pub fn new(price: f64, source: QuoteSource) -> Self {
        Self {
            price,
            confidence: source.default_confidence(),
            source,
            fetched_at: Utc::now(),
            is_stale: false,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// True when the price may not reflect the market right now.
    pub fn is_indicative(&self) -> bool {
        self.is_stale || self.source == QuoteSource::Mock
    }
}

/// Flattened quote handed to UI surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LivePrice {
    pub price: f64,
    pub source: String,
    pub is_stale: bool,
    pub confidence: f64,
}

impl From<&PriceQuote> for LivePrice {
    fn from(quote: &PriceQuote) -> Self {
        LivePrice {
            price: quote.price,
            source: quote.source.to_string(),
            is_stale: quote.is_indicative(),
            confidence: quote.confidence,
        }
    }
}

/// Rejects zero, negative and non-finite prices.
pub fn validate_price(price: f64) -> Result<f64, ProviderError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(ProviderError::invalid_price(price))
    }
}

/// One external gold price API.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Confidence attached to prices this provider returns.
    fn confidence(&self) -> f64 {
        PROVIDER_CONFIDENCE
    }

    /// Fetches the current price in INR per gram.
    async fn fetch(&self, timeout: Duration) -> Result<f64, ProviderError>;
}
