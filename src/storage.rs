//! Settings Storage Backends
//!
//! The host's key-value persistence surface as a trait, with two backends:
//! - [`SqliteStorage`]: one row per namespace, the whole record serialized
//!   as a JSON blob (the serialized-option convention)
//! - [`MemoryStorage`]: ephemeral map for tests and in-process hosts
//!
//! Reads of an absent namespace resolve to `None`, never an error; saves
//! replace the stored record wholesale.

use crate::error::SettingsError;
use crate::record::SettingsRecord;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tokio::sync::RwLock;

// ============================================
// Storage Trait
// ============================================

/// Persistence seam between the settings store and the host.
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Load the record for a namespace. Absent namespaces yield `None`.
    async fn load(&self, namespace: &str) -> Result<Option<SettingsRecord>, SettingsError>;

    /// Replace the record for a namespace wholesale.
    async fn store(&self, namespace: &str, record: &SettingsRecord) -> Result<(), SettingsError>;

    /// Remove the record for a namespace (plugin uninstall).
    async fn remove(&self, namespace: &str) -> Result<(), SettingsError>;
}

// ============================================
// SQLite Backend
// ============================================

/// SQLite-backed storage: `plugin_settings(namespace, record, updated_at)`.
pub struct SqliteStorage {
    db: SqlitePool,
}

impl SqliteStorage {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create the settings table if it does not exist. Idempotent.
    pub async fn migrate(&self) -> Result<(), SettingsError> {
        tracing::info!("Running settings storage migration");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS plugin_settings (
                namespace TEXT PRIMARY KEY,
                record TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.db)
        .await
        .map_err(|e| SettingsError::Migration(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SettingsStorage for SqliteStorage {
    async fn load(&self, namespace: &str) -> Result<Option<SettingsRecord>, SettingsError> {
        let row = sqlx::query("SELECT record FROM plugin_settings WHERE namespace = ?")
            .bind(namespace)
            .fetch_optional(&self.db)
            .await?;

        match row {
            Some(row) => {
                let blob: String = row.try_get("record")?;
                let record: SettingsRecord = serde_json::from_str(&blob)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn store(&self, namespace: &str, record: &SettingsRecord) -> Result<(), SettingsError> {
        let blob = serde_json::to_string(record)?;

        sqlx::query(
            r#"
            INSERT INTO plugin_settings (namespace, record, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(namespace) DO UPDATE SET
                record = excluded.record,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(namespace)
        .bind(blob)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn remove(&self, namespace: &str) -> Result<(), SettingsError> {
        sqlx::query("DELETE FROM plugin_settings WHERE namespace = ?")
            .bind(namespace)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

// ============================================
// In-Memory Backend
// ============================================

/// Map-backed storage with no persistence across restarts.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, SettingsRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStorage for MemoryStorage {
    async fn load(&self, namespace: &str) -> Result<Option<SettingsRecord>, SettingsError> {
        Ok(self.records.read().await.get(namespace).cloned())
    }

    async fn store(&self, namespace: &str, record: &SettingsRecord) -> Result<(), SettingsError> {
        self.records
            .write()
            .await
            .insert(namespace.to_string(), record.clone());
        Ok(())
    }

    async fn remove(&self, namespace: &str) -> Result<(), SettingsError> {
        self.records.write().await.remove(namespace);
        Ok(())
    }
}

// ============================================
// Module Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_load_absent() {
        let storage = MemoryStorage::new();
        assert!(storage.load("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_store_and_load() {
        let storage = MemoryStorage::new();

        let mut record = SettingsRecord::new();
        record.insert("text_field", "Hello");

        storage.store("Demo", &record).await.unwrap();
        let loaded = storage.load("Demo").await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_memory_storage_overwrites_wholesale() {
        let storage = MemoryStorage::new();

        let mut first = SettingsRecord::new();
        first.insert("text_field", "Hello");
        first.insert("checkbox_field", "1");
        storage.store("Demo", &first).await.unwrap();

        let mut second = SettingsRecord::new();
        second.insert("text_field", "World");
        storage.store("Demo", &second).await.unwrap();

        let loaded = storage.load("Demo").await.unwrap().unwrap();
        assert_eq!(loaded, second);
        assert!(loaded.get("checkbox_field").is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_remove() {
        let storage = MemoryStorage::new();

        let mut record = SettingsRecord::new();
        record.insert("text_field", "Hello");
        storage.store("Demo", &record).await.unwrap();

        storage.remove("Demo").await.unwrap();
        assert!(storage.load("Demo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let storage = MemoryStorage::new();

        let mut record = SettingsRecord::new();
        record.insert("text_field", "Hello");
        storage.store("Demo", &record).await.unwrap();

        assert!(storage.load("Other").await.unwrap().is_none());
    }
}
