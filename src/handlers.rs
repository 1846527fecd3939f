//! Settings HTTP Handlers
//!
//! REST surface for reading and updating the demo settings record, plus
//! the rendered admin form. The router state owns the single store
//! instance; handlers receive it by handle, never through a global.

use crate::error::SettingsError;
use crate::fields::FieldRegistry;
use crate::record::SettingsRecord;
use crate::sanitize::{Advisory, Sanitizer};
use crate::store::SettingsStore;

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handler state: the store plus the form wiring around it.
#[derive(Clone)]
pub struct SettingsDemoState {
    pub store: Arc<SettingsStore>,
    pub registry: Arc<FieldRegistry>,
    pub sanitizer: Arc<Sanitizer>,
}

// ============================================
// Route Builder
// ============================================

/// Create the settings routes.
pub fn create_routes(state: SettingsDemoState) -> Router {
    Router::new()
        .route(
            "/settings-demo/settings",
            get(get_settings).put(update_settings),
        )
        .route("/settings-demo/form", get(render_form))
        .with_state(state)
}

// ============================================
// Request / Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: SettingsRecord,
}

#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    pub message: String,
    pub advisories: Vec<Advisory>,
}

// ============================================
// Handlers
// ============================================

/// GET /settings-demo/settings
///
/// Current settings with registered defaults applied.
pub async fn get_settings(State(state): State<SettingsDemoState>) -> impl IntoResponse {
    let snap = state.store.snapshot().await;

    let mut settings = serde_json::Map::new();
    for descriptor in state.registry.descriptors() {
        let value = descriptor
            .resolve(&snap)
            .map(|v| serde_json::to_value(v).unwrap_or(serde_json::Value::Null))
            .unwrap_or(serde_json::Value::Null);
        settings.insert(descriptor.name.clone(), value);
    }

    Json(serde_json::json!({
        "namespace": state.store.namespace(),
        "settings": settings
    }))
}

/// PUT /settings-demo/settings
///
/// Sanitize and persist a submitted mapping wholesale. Advisories are
/// returned in the response and logged; they never block the write.
pub async fn update_settings(
    State(state): State<SettingsDemoState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, SettingsError> {
    let outcome = state.sanitizer.sanitize(req.settings);

    for advisory in &outcome.advisories {
        tracing::warn!(
            namespace = %state.store.namespace(),
            field = %advisory.field,
            "Settings advisory: {}",
            advisory.message
        );
    }

    state.store.save(&outcome.record).await?;

    Ok(Json(UpdateSettingsResponse {
        message: "Settings saved".into(),
        advisories: outcome.advisories,
    }))
}

/// GET /settings-demo/form
///
/// Admin form markup with every registered field bound to the record.
pub async fn render_form(State(state): State<SettingsDemoState>) -> impl IntoResponse {
    let snap = state.store.snapshot().await;

    Html(format!(
        "<form method=\"post\" action=\"/settings-demo/settings\">\n{}\
         <p><input type=\"submit\" value=\"Save Changes\" /></p>\n</form>\n",
        state.registry.render_all(&snap)
    ))
}
