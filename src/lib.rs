//! RustPress Settings Demo Plugin
//!
//! A didactic plugin demonstrating the settings-storage convention:
//! - One namespaced settings record, persisted as a single serialized blob
//! - Read-with-default / write-with-sanitize semantics
//! - Deterministic form binding (`field_id` / `field_name`)
//! - Advisory (non-blocking) validation surfaced to the operator
//! - An ordered field registry driving the admin form markup
//!
//! # Usage
//!
//! ```rust,ignore
//! use rustpress_settings_demo::{Plugin, SettingsDemoPlugin};
//!
//! // Initialize plugin
//! let plugin = SettingsDemoPlugin::new();
//! plugin.activate(db_pool).await?;
//!
//! // Mount the settings routes
//! let router = plugin.api_state().await.map(rustpress_settings_demo::create_routes);
//! ```

pub mod error;
pub mod fields;
pub mod handlers;
pub mod record;
pub mod sanitize;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use error::SettingsError;
pub use fields::{FieldDescriptor, FieldRegistry};
pub use handlers::{create_routes, SettingsDemoState};
pub use record::{SettingValue, SettingsRecord};
pub use sanitize::{Advisory, SanitizeOutcome, Sanitizer};
pub use storage::{MemoryStorage, SettingsStorage, SqliteStorage};
pub use store::{Selection, SettingsSnapshot, SettingsStore};

use async_trait::async_trait;
use axum::Router;
use fields::renderers;
use sanitize::rules;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Namespace scoping every persisted key and generated identifier.
pub const DEMO_NAMESPACE: &str = "Demo";

// ============================================
// Plugin Types (Standalone - no external deps)
// ============================================

/// Plugin state enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Inactive,
    Active,
    Error,
}

/// Plugin metadata
#[derive(Debug, Clone)]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Plugin lifecycle trait
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Get plugin information
    fn info(&self) -> &PluginInfo;

    /// Get current plugin state
    async fn state(&self) -> PluginState;

    /// Activate the plugin
    async fn activate(&self, db: SqlitePool) -> Result<(), SettingsError>;

    /// Deactivate the plugin
    async fn deactivate(&self) -> Result<(), SettingsError>;

    /// Get plugin routes
    fn routes(&self) -> Option<Router>;
}

// ============================================
// Demo Wiring
// ============================================

/// The tutorial's field set, in render order.
fn demo_registry() -> FieldRegistry {
    FieldRegistry::new()
        .register(
            FieldDescriptor::new("text_field", "Text Field").with_default("Default value"),
            renderers::text(),
        )
        .register(
            FieldDescriptor::new("textarea_field", "Textarea Field"),
            renderers::textarea(),
        )
        .register(
            FieldDescriptor::new("checkbox_field", "Checkbox Field"),
            renderers::checkbox(),
        )
        .register(
            FieldDescriptor::new("h_radio_field", "Radio Field"),
            renderers::radio(&[("1", "Option One"), ("2", "Option Two"), ("3", "Option Three")]),
        )
        .register(
            FieldDescriptor::new("select_field", "Select Field"),
            renderers::select(&[("one", "Option One"), ("two", "Option Two"), ("three", "Option Three")]),
        )
}

/// Sanitize rules matching the demo fields.
fn demo_sanitizer() -> Sanitizer {
    Sanitizer::new()
        .rule("text_field", rules::trimmed())
        .rule("textarea_field", rules::trimmed())
        .rule("checkbox_field", rules::flag())
        .rule("h_radio_field", rules::one_of(&["1", "2", "3"]))
        .rule("select_field", rules::one_of(&["one", "two", "three"]))
}

// ============================================
// Settings Demo Plugin
// ============================================

/// RustPress Settings Demo Plugin
///
/// Owns the single settings store instance and hands it to the router
/// state; nothing in the crate reaches for a global.
pub struct SettingsDemoPlugin {
    info: PluginInfo,
    state: RwLock<PluginState>,
    api_state: RwLock<Option<SettingsDemoState>>,
}

impl SettingsDemoPlugin {
    /// Create a new settings demo plugin instance
    pub fn new() -> Self {
        Self {
            info: PluginInfo {
                id: "settings-demo".into(),
                name: "RustPress Settings Demo".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                description: "Didactic settings management plugin for RustPress".into(),
            },
            state: RwLock::new(PluginState::Inactive),
            api_state: RwLock::new(None),
        }
    }

    /// Get the settings store, if active
    pub async fn settings(&self) -> Option<Arc<SettingsStore>> {
        self.api_state.read().await.as_ref().map(|s| s.store.clone())
    }

    /// Get the handler state, if active
    pub async fn api_state(&self) -> Option<SettingsDemoState> {
        self.api_state.read().await.clone()
    }

    /// Remove every persisted value for this plugin's namespace.
    pub async fn uninstall(&self) -> Result<(), SettingsError> {
        tracing::info!("Uninstalling RustPress Settings Demo");

        if let Some(state) = self.api_state.read().await.as_ref() {
            state.store.remove_all().await?;
        }
        self.deactivate().await
    }
}

impl Default for SettingsDemoPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for SettingsDemoPlugin {
    fn info(&self) -> &PluginInfo {
        &self.info
    }

    async fn state(&self) -> PluginState {
        *self.state.read().await
    }

    async fn activate(&self, db: SqlitePool) -> Result<(), SettingsError> {
        tracing::info!("Activating RustPress Settings Demo plugin");

        // Run migrations
        let storage = SqliteStorage::new(db);
        storage.migrate().await?;

        // Build the store and its form wiring
        let store = Arc::new(SettingsStore::new(DEMO_NAMESPACE, Arc::new(storage)));
        let state = SettingsDemoState {
            store,
            registry: Arc::new(demo_registry()),
            sanitizer: Arc::new(demo_sanitizer()),
        };

        *self.api_state.write().await = Some(state);
        *self.state.write().await = PluginState::Active;

        tracing::info!("RustPress Settings Demo plugin activated successfully");
        Ok(())
    }

    async fn deactivate(&self) -> Result<(), SettingsError> {
        tracing::info!("Deactivating RustPress Settings Demo plugin");

        *self.api_state.write().await = None;
        *self.state.write().await = PluginState::Inactive;
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        // Routes are created from the handler state once the plugin is
        // active; use create_routes() with api_state()
        None
    }
}

// ============================================
// Module Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_info() {
        let plugin = SettingsDemoPlugin::new();
        assert_eq!(plugin.info.id, "settings-demo");
        assert_eq!(plugin.info.name, "RustPress Settings Demo");
    }

    #[tokio::test]
    async fn test_plugin_initial_state() {
        let plugin = SettingsDemoPlugin::new();
        assert_eq!(plugin.state().await, PluginState::Inactive);
        assert!(plugin.settings().await.is_none());
    }

    #[test]
    fn test_demo_registry_field_order() {
        let registry = demo_registry();
        let names: Vec<&str> = registry.descriptors().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "text_field",
                "textarea_field",
                "checkbox_field",
                "h_radio_field",
                "select_field"
            ]
        );
    }
}
