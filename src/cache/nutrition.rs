use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::database::KeyValueStore;
use crate::food::nutrition::NutritionEstimate;

pub const NUTRITION_STORAGE_KEY: &str = "nutritionById";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to serialize nutrition cache: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to persist nutrition cache: {0}")]
    Storage(String),
}

/// Recipe id → estimate, mirrored in full to durable storage on every write.
///
/// Entries never expire and are never evicted.
pub struct NutritionCache {
    entries: RwLock<BTreeMap<String, NutritionEstimate>>,
    store: Arc<dyn KeyValueStore>,
    // Serialises snapshot+write so storage always ends on the newest snapshot.
    persist_lock: Mutex<()>,
}

impl NutritionCache {
    /// Rehydrates from storage. Missing, unreadable or malformed data yields
    /// an empty cache.
    pub async fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.read(NUTRITION_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<BTreeMap<String, NutritionEstimate>>(&raw) {
                Ok(entries) => {
                    debug!("Restored {} nutrition estimates", entries.len());
                    entries
                }
                Err(e) => {
                    warn!("Discarding malformed nutrition cache: {}", e);
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read nutrition cache, starting empty: {}", e);
                BTreeMap::new()
            }
        };

        Self {
            entries: RwLock::new(entries),
            store,
            persist_lock: Mutex::new(()),
        }
    }

    pub fn get(&self, id: &str) -> Option<NutritionEstimate> {
        self.entries.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<String, NutritionEstimate> {
        self.entries.read().clone()
    }

    /// Merges one entry and rewrites the whole mapping to storage. The entry
    /// stays in memory even if persisting fails.
    pub async fn set(&self, id: &str, estimate: NutritionEstimate) -> Result<(), CacheError> {
        self.entries.write().insert(id.to_string(), estimate);

        let _guard = self.persist_lock.lock().await;
        let serialized = serde_json::to_string(&*self.entries.read())?;
        self.store
            .write(NUTRITION_STORAGE_KEY, serialized)
            .await
            .map_err(|e| CacheError::Storage(e.to_string()))
    }
}
