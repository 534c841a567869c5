//! Last-known-price cache used by the resolver.

use crate::core::price::PriceQuote;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Backend holding the most recent successful quote.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn load(&self) -> Option<PriceQuote>;
    async fn save(&self, quote: &PriceQuote);
    async fn clear(&self);
}

/// A quote store paired with a freshness window.
#[derive(Clone)]
pub struct QuoteCache {
    store: Arc<dyn QuoteStore>,
    ttl: Duration,
}

impl QuoteCache {
    pub fn new(store: Arc<dyn QuoteStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached quote while it is younger than the ttl.
    pub async fn fresh(&self) -> Option<PriceQuote> {
        let quote = self.store.load().await?;
        let age = Utc::now()
            .signed_duration_since(quote.fetched_at)
            .to_std()
            .unwrap_or_default();
        if age < self.ttl {
            debug!("Cache HIT, quote age {:?}", age);
            Some(quote)
        } else {
            debug!("Cache entry expired, quote age {:?}", age);
            None
        }
    }

    /// Returns the cached quote regardless of age.
    pub async fn latest(&self) -> Option<PriceQuote> {
        self.store.load().await
    }

    pub async fn put(&self, quote: &PriceQuote) {
        debug!("Cache PUT from {}", quote.source);
        self.store.save(quote).await;
    }

    pub async fn clear(&self) {
        self.store.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::QuoteSource;
    use crate::store::memory::MemoryQuoteStore;

    #[tokio::test]
    async fn test_fresh_and_latest() {
        let cache = QuoteCache::new(Arc::new(MemoryQuoteStore::new()), Duration::from_secs(300));
        assert!(cache.fresh().await.is_none());
        assert!(cache.latest().await.is_none());

        let quote = PriceQuote::new(10500.0, QuoteSource::Provider("GoldAPI".to_string()));
        cache.put(&quote).await;

        assert_eq!(cache.fresh().await, Some(quote.clone()));
        assert_eq!(cache.latest().await, Some(quote));
    }

    #[tokio::test]
    async fn test_expired_quote_is_only_latest() {
        let cache = QuoteCache::new(Arc::new(MemoryQuoteStore::new()), Duration::from_secs(300));
        let mut quote = PriceQuote::new(10500.0, QuoteSource::Provider("GoldAPI".to_string()));
        quote.fetched_at = Utc::now() - chrono::Duration::minutes(10);
        cache.put(&quote).await;

        assert!(cache.fresh().await.is_none());
        assert_eq!(cache.latest().await.map(|q| q.price), Some(10500.0));

        cache.clear().await;
        assert!(cache.latest().await.is_none());
    }
}
