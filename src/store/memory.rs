use crate::core::cache::QuoteStore;
use crate::core::price::PriceQuote;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory quote store; lives as long as the process.
#[derive(Clone, Default)]
pub struct MemoryQuoteStore {
    inner: Arc<Mutex<Option<PriceQuote>>>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn load(&self) -> Option<PriceQuote> {
        let slot = self.inner.lock().await;
        if slot.is_none() {
            debug!("Quote store MISS");
        }
        slot.clone()
    }

    async fn save(&self, quote: &PriceQuote) {
        let mut slot = self.inner.lock().await;
        *slot = Some(quote.clone());
    }

    async fn clear(&self) {
        let mut slot = self.inner.lock().await;
        *slot = None;
        debug!("Quote store CLEAR");
    }
}
