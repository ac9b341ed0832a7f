// src/services/catalog_service.rs
//
// Catalog listing with cache-aside population.

use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::domain::{Character, CharacterFilter, SortOrder};
use crate::error::AppResult;
use crate::remote::RemoteClient;
use crate::store::CharacterStore;

pub struct CatalogService {
    store: Arc<dyn CharacterStore>,
    remote: Arc<dyn RemoteClient>,

    // Single key: the catalog is populated as a whole or not at all
    populate_lock: AsyncMutex<()>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CharacterStore>, remote: Arc<dyn RemoteClient>) -> Self {
        Self {
            store,
            remote,
            populate_lock: AsyncMutex::new(()),
        }
    }

    /// List characters matching `filter`, populating the store from
    /// the remote catalog on a miss.
    ///
    /// A miss always fetches the complete catalog, so one cold load
    /// warms the store for every later filter. The caller's filter is
    /// applied again after population, which makes an empty result
    /// after a successful fetch a real "no match", not a failure.
    /// Remote errors surface unchanged and leave the store as it was.
    pub async fn load_characters(&self, filter: &CharacterFilter) -> AppResult<Vec<Character>> {
        let cached = self.store.query_characters(filter, SortOrder::Ascending);
        if !cached.is_empty() {
            debug!(count = cached.len(), "catalog served from store");
            return Ok(cached);
        }

        let _guard = self.populate_lock.lock().await;

        // Someone else may have populated while we waited for the lock
        let cached = self.store.query_characters(filter, SortOrder::Ascending);
        if !cached.is_empty() {
            debug!(count = cached.len(), "catalog populated while waiting");
            return Ok(cached);
        }

        let records = self.remote.fetch_characters("").await?;
        debug!(count = records.len(), "catalog fetched");
        self.store.insert_characters(&records);

        Ok(self.store.query_characters(filter, SortOrder::Ascending))
    }
}
