//! Resolves a usable gold price from an ordered list of unreliable providers.
//!
//! Resolution never fails. Providers are tried one at a time in ascending
//! priority; the first valid price is cached and returned. When every
//! provider fails, the last cached quote is returned flagged stale, and
//! without one the configured mock price is used.
use crate::core::cache::QuoteCache;
use crate::core::error::ProviderError;
use crate::core::price::{
    LivePrice, PriceProvider, PriceQuote, QuoteSource, STALE_CONFIDENCE, validate_price,
};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Outcome of calling a single provider during one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub provider: String,
    pub outcome: Result<f64, ProviderError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub quote: PriceQuote,
    pub attempts: Vec<Attempt>,
}

pub struct PriceResolver {
    providers: Vec<Box<dyn PriceProvider>>,
    cache: QuoteCache,
    mock_price: f64,
    default_timeout: Duration,
}

impl PriceResolver {
    /// `providers` pairs each adapter with its priority; lower runs first and
    /// ties keep their given order.
    pub fn new(
        mut providers: Vec<(u32, Box<dyn PriceProvider>)>,
        cache: QuoteCache,
        mock_price: f64,
        default_timeout: Duration,
    ) -> Self {
        providers.sort_by_key(|(priority, _)| *priority);
        Self {
            providers: providers.into_iter().map(|(_, p)| p).collect(),
            cache,
            mock_price,
            default_timeout,
        }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn get_price(&self, timeout: Duration) -> PriceQuote {
        self.resolve(timeout).await.quote
    }

    pub async fn get_live_price(&self) -> LivePrice {
        LivePrice::from(&self.get_price(self.default_timeout).await)
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    #[instrument(name = "ResolveGoldPrice", skip(self))]
    pub async fn resolve(&self, timeout: Duration) -> Resolution {
        if let Some(cached) = self.cache.fresh().await {
            debug!("Using cached price {} from {}", cached.price, cached.source);
            return Resolution {
                quote: PriceQuote {
                    source: QuoteSource::Cache,
                    is_stale: false,
                    ..cached
                },
                attempts: Vec::new(),
            };
        }

        let mut attempts = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let outcome = fetch_with_timeout(provider.as_ref(), timeout).await;
            let name = provider.name().to_string();
            match outcome {
                Ok(price) => {
                    info!("Fetched gold price {price} from {name}");
                    let quote = PriceQuote::new(price, QuoteSource::Provider(name.clone()))
                        .with_confidence(provider.confidence());
                    self.cache.put(&quote).await;
                    attempts.push(Attempt {
                        provider: name,
                        outcome: Ok(price),
                    });
                    return Resolution { quote, attempts };
                }
                Err(e) => {
                    warn!(provider = %name, reason = ?e.reason, "Price provider failed: {e}");
                    attempts.push(Attempt {
                        provider: name,
                        outcome: Err(e),
                    });
                }
            }
        }

        let quote = match self.cache.latest().await {
            Some(stale) => {
                warn!(
                    "All price providers failed, using stale cached price from {}",
                    stale.fetched_at
                );
                PriceQuote {
                    source: QuoteSource::Cache,
                    is_stale: true,
                    confidence: STALE_CONFIDENCE,
                    ..stale
                }
            }
            None => {
                warn!(
                    "All price providers failed and nothing is cached, using mock price {}",
                    self.mock_price
                );
                PriceQuote::new(self.mock_price, QuoteSource::Mock)
            }
        };
        Resolution { quote, attempts }
    }
}

async fn fetch_with_timeout(
    provider: &dyn PriceProvider,
    timeout: Duration,
) -> Result<f64, ProviderError> {
    match tokio::time::timeout(timeout, provider.fetch(timeout)).await {
        Ok(result) => validate_price(result?),
        Err(_) => Err(ProviderError::timeout(format!(
            "no response within {timeout:?}"
        ))),
    }
}
