pub mod database;
pub mod memory;

use async_trait::async_trait;

pub use database::Database;
pub use database::DatabaseError;
pub use memory::MemoryStore;

/// Durable string storage addressed by key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn read(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn write(&self, key: &str, value: String) -> anyhow::Result<()>;
}
