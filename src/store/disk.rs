use crate::core::cache::QuoteStore;
use crate::core::price::PriceQuote;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "quotes";
const LAST_QUOTE_KEY: &[u8] = b"gold";

/// Quote store persisted with fjall so a stale price survives restarts.
pub struct DiskQuoteStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskQuoteStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;
        let keyspace = fjall::Config::new(path).open()?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl QuoteStore for DiskQuoteStore {
    async fn load(&self) -> Option<PriceQuote> {
        let res: Result<Option<PriceQuote>> = (|| {
            match self.partition.get(LAST_QUOTE_KEY)? {
                Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
                None => Ok(None),
            }
        })();

        match res {
            Ok(quote) => quote,
            Err(e) => {
                debug!("DiskQuoteStore load error: {}", e);
                None
            }
        }
    }

    async fn save(&self, quote: &PriceQuote) {
        let res: Result<()> = (|| {
            self.partition
                .insert(LAST_QUOTE_KEY, serde_json::to_vec(quote)?)?;
            self.keyspace.persist(PersistMode::SyncAll)?;
            Ok(())
        })();
        if let Err(e) = res {
            debug!("DiskQuoteStore save error: {}", e);
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.partition.remove(LAST_QUOTE_KEY) {
            debug!("DiskQuoteStore clear error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::QuoteSource;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_store_save_load() {
        let dir = tempdir().unwrap();
        let store = DiskQuoteStore::open(dir.path()).unwrap();

        assert!(store.load().await.is_none());

        let quote = PriceQuote::new(10450.25, QuoteSource::Provider("GoldAPI".to_string()));
        store.save(&quote).await;
        assert_eq!(store.load().await, Some(quote));

        store.clear().await;
        assert!(store.load().await.is_none());
    }
}
