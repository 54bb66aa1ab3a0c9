use async_trait::async_trait;
use log::info;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio_rusqlite::Connection;

use super::KeyValueStore;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),
    #[error("Database connection error: {0}")]
    Connection(String),
}

/// SQLite-backed key/value storage.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Connection>,
}

impl Database {
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::Connection(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = Self { conn: Arc::new(conn) };
        db.initialize().await?;
        Ok(db)
    }

    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = Self { conn: Arc::new(conn) };
        db.initialize().await?;
        Ok(db)
    }

    async fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS kv_store (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL,
                        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
                    );",
                )?;
                Ok(())
            })
            .await?;

        info!("Database initialized successfully");
        Ok(())
    }

    pub async fn put_value(&self, key: String, value: String) -> Result<(), DatabaseError> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
                     VALUES (?1, ?2, CURRENT_TIMESTAMP)",
                    [&key, &value],
                )?;
                Ok(())
            })
            .await?;

        Ok(())
    }

    pub async fn get_value(&self, key: String) -> Result<Option<String>, DatabaseError> {
        let result = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?")?;
                let mut rows = stmt.query([&key])?;

                if let Some(row) = rows.next()? {
                    Ok(Some(row.get::<_, String>(0)?))
                } else {
                    Ok(None)
                }
            })
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl KeyValueStore for Database {
    async fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.get_value(key.to_string()).await?)
    }

    async fn write(&self, key: &str, value: String) -> anyhow::Result<()> {
        Ok(self.put_value(key.to_string(), value).await?)
    }
}
