pub mod disk;
pub mod memory;

use crate::core::cache::QuoteStore;
use crate::core::config::AppConfig;
use disk::DiskQuoteStore;
use memory::MemoryQuoteStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Opens the quote store selected by configuration.
///
/// A persistent store lives under `<data_path>/cache`. If it cannot be opened
/// the store degrades to memory so price resolution keeps working.
pub fn open_quote_store(config: &AppConfig) -> Arc<dyn QuoteStore> {
    if !config.cache.persist {
        debug!("Quote persistence disabled, using memory store");
        return Arc::new(MemoryQuoteStore::new());
    }

    let opened = config
        .default_data_path()
        .and_then(|path| DiskQuoteStore::open(&path.join("cache")));
    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Could not open quote store on disk, falling back to memory: {e}");
            Arc::new(MemoryQuoteStore::new())
        }
    }
}
