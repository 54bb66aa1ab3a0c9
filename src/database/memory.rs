use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::KeyValueStore;

/// Process-local store. Clones share the same map, so a clone handed to a
/// fresh cache behaves like reopening the same storage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.values.write().insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn write(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }
}
