//! Settings Store
//!
//! Read/write access to one namespaced settings record, plus the
//! deterministic form-binding helpers (`field_id` / `field_name`) that map
//! HTML form elements onto stored keys. The store is an explicitly
//! constructed object owned by the host-integration layer; there is no
//! global instance.
//!
//! Reads never fail: an absent record, a missing key, or a degraded
//! storage backend all resolve to the caller-supplied default.

use crate::error::SettingsError;
use crate::record::{SettingValue, SettingsRecord};
use crate::storage::SettingsStorage;

use std::sync::Arc;

// ============================================
// Form Binding Helpers
// ============================================

/// Unique HTML element id for a field: `<namespace>_settings_<name>`.
pub fn field_id(namespace: &str, name: &str) -> String {
    format!("{}_settings_{}", namespace, name)
}

/// HTML form submission key for a field: `<namespace>_settings[<name>]`.
///
/// The array-style key makes every field of the form submit into one
/// mapping in a single post.
pub fn field_name(namespace: &str, name: &str) -> String {
    format!("{}_settings[{}]", namespace, name)
}

// ============================================
// Selection Source
// ============================================

/// What a checked/selected decision is based on: a stored field looked up
/// by name, or a flag the caller already resolved.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    Field(&'a str),
    Flag(bool),
}

// ============================================
// Snapshot
// ============================================

/// A point-in-time view of one namespace's record.
///
/// All operations are pure functions of `(namespace, record)`, so
/// rendering code can resolve values, ids, and checked states without
/// touching storage again.
#[derive(Debug, Clone)]
pub struct SettingsSnapshot {
    namespace: String,
    record: SettingsRecord,
}

impl SettingsSnapshot {
    pub fn new(namespace: impl Into<String>, record: SettingsRecord) -> Self {
        Self {
            namespace: namespace.into(),
            record,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn record(&self) -> &SettingsRecord {
        &self.record
    }

    /// Look up a stored value. Missing keys yield `None`, never an error.
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.record.get(name)
    }

    /// Look up a stored value, falling back to `default` when absent.
    pub fn get_or(&self, name: &str, default: impl Into<SettingValue>) -> SettingValue {
        self.record
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    pub fn field_id(&self, name: &str) -> String {
        field_id(&self.namespace, name)
    }

    pub fn field_name(&self, name: &str) -> String {
        field_name(&self.namespace, name)
    }

    /// Decide whether a checkbox/radio/select option renders as checked.
    ///
    /// A `Field` source compares the stored value against `expected` with
    /// loose equality (missing fields never match); a `Flag` source is
    /// returned as-is.
    pub fn is_selected(&self, source: Selection<'_>, expected: impl Into<SettingValue>) -> bool {
        match source {
            Selection::Flag(flag) => flag,
            Selection::Field(name) => match self.record.get(name) {
                Some(stored) => stored.loosely_matches(&expected.into()),
                None => false,
            },
        }
    }
}

// ============================================
// Settings Store
// ============================================

/// Async store over one namespace's record in a storage backend.
pub struct SettingsStore {
    namespace: String,
    storage: Arc<dyn SettingsStorage>,
}

impl SettingsStore {
    pub fn new(namespace: impl Into<String>, storage: Arc<dyn SettingsStorage>) -> Self {
        Self {
            namespace: namespace.into(),
            storage,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Load the current record as a snapshot.
    ///
    /// A failing backend degrades to the empty record with a warning, so
    /// rendering paths keep working on defaults.
    pub async fn snapshot(&self) -> SettingsSnapshot {
        let record = match self.storage.load(&self.namespace).await {
            Ok(Some(record)) => record,
            Ok(None) => SettingsRecord::new(),
            Err(e) => {
                tracing::warn!(
                    namespace = %self.namespace,
                    "Settings read degraded to defaults: {}",
                    e
                );
                SettingsRecord::new()
            }
        };

        SettingsSnapshot::new(self.namespace.clone(), record)
    }

    pub async fn get(&self, name: &str) -> Option<SettingValue> {
        self.snapshot().await.get(name).cloned()
    }

    pub async fn get_or(&self, name: &str, default: impl Into<SettingValue>) -> SettingValue {
        self.snapshot().await.get_or(name, default)
    }

    pub fn field_id(&self, name: &str) -> String {
        field_id(&self.namespace, name)
    }

    pub fn field_name(&self, name: &str) -> String {
        field_name(&self.namespace, name)
    }

    /// Replace the stored record wholesale.
    ///
    /// Persistence failures are fatal for this single write and surface to
    /// the caller without retry; settings writes are idempotent and
    /// infrequent.
    pub async fn save(&self, record: &SettingsRecord) -> Result<(), SettingsError> {
        self.storage.store(&self.namespace, record).await?;
        tracing::info!(
            namespace = %self.namespace,
            fields = record.len(),
            "Settings record saved"
        );
        Ok(())
    }

    /// Drop the namespace's record entirely (plugin uninstall).
    pub async fn remove_all(&self) -> Result<(), SettingsError> {
        self.storage.remove(&self.namespace).await
    }
}

// ============================================
// Module Tests
// ============================================
