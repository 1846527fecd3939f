//! Form Field Registry
//!
//! Ordered table mapping field names to descriptors and rendering
//! closures. Rendering code looks fields up in the table instead of
//! dispatching dynamically by name, and every generated element is bound
//! to the settings record through `field_id` / `field_name`.

use crate::record::SettingValue;
use crate::store::{Selection, SettingsSnapshot};

// ============================================
// Descriptors
// ============================================

/// A field's read-time description: its stored name, the label shown next
/// to it, and an optional default used when the record has no value. Never
/// persisted.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub default: Option<SettingValue>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<SettingValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Resolve the field's current value against a snapshot.
    pub fn resolve(&self, snap: &SettingsSnapshot) -> Option<SettingValue> {
        snap.get(&self.name).cloned().or_else(|| self.default.clone())
    }
}

// ============================================
// Registry
// ============================================

pub type FieldRenderer = Box<dyn Fn(&FieldDescriptor, &SettingsSnapshot) -> String + Send + Sync>;

/// Ordered field table: registration order is render order.
#[derive(Default)]
pub struct FieldRegistry {
    fields: Vec<(FieldDescriptor, FieldRenderer)>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, descriptor: FieldDescriptor, renderer: FieldRenderer) -> Self {
        self.fields.push((descriptor, renderer));
        self
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().map(|(d, _)| d)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render one field by table lookup.
    pub fn render(&self, name: &str, snap: &SettingsSnapshot) -> Option<String> {
        self.fields
            .iter()
            .find(|(d, _)| d.name == name)
            .map(|(d, r)| r(d, snap))
    }

    /// Render every field in registration order, one row per field.
    pub fn render_all(&self, snap: &SettingsSnapshot) -> String {
        let mut html = String::new();
        for (descriptor, renderer) in &self.fields {
            html.push_str(&format!(
                "<p><label for=\"{}\">{}</label><br/>{}</p>\n",
                escape_attr(&snap.field_id(&descriptor.name)),
                escape_html(&descriptor.label),
                renderer(descriptor, snap)
            ));
        }
        html
    }
}

// ============================================
// Built-in Renderers
// ============================================

/// Renderer constructors for the standard field shapes.
pub mod renderers {
    use super::*;

    fn resolved_text(descriptor: &FieldDescriptor, snap: &SettingsSnapshot) -> String {
        descriptor
            .resolve(snap)
            .map(|v| v.canonical())
            .unwrap_or_default()
    }

    /// `<input type="text">` bound to the field.
    pub fn text() -> FieldRenderer {
        Box::new(|descriptor, snap| {
            format!(
                r#"<input type="text" id="{}" name="{}" value="{}" />"#,
                escape_attr(&snap.field_id(&descriptor.name)),
                escape_attr(&snap.field_name(&descriptor.name)),
                escape_attr(&resolved_text(descriptor, snap)),
            )
        })
    }

    /// `<textarea>` bound to the field.
    pub fn textarea() -> FieldRenderer {
        Box::new(|descriptor, snap| {
            format!(
                r#"<textarea id="{}" name="{}" rows="5" cols="50">{}</textarea>"#,
                escape_attr(&snap.field_id(&descriptor.name)),
                escape_attr(&snap.field_name(&descriptor.name)),
                escape_html(&resolved_text(descriptor, snap)),
            )
        })
    }

    /// Single checkbox submitting `"1"` when checked.
    pub fn checkbox() -> FieldRenderer {
        Box::new(|descriptor, snap| {
            let checked = snap.is_selected(Selection::Field(&descriptor.name), "1");
            format!(
                r#"<input type="checkbox" id="{}" name="{}" value="1"{} />"#,
                escape_attr(&snap.field_id(&descriptor.name)),
                escape_attr(&snap.field_name(&descriptor.name)),
                if checked { " checked" } else { "" },
            )
        })
    }

    /// Radio group over `(value, label)` options.
    pub fn radio(options: &'static [(&'static str, &'static str)]) -> FieldRenderer {
        Box::new(move |descriptor, snap| {
            let mut html = String::new();
            for (value, label) in options {
                let checked = snap.is_selected(Selection::Field(&descriptor.name), *value);
                html.push_str(&format!(
                    r#"<label><input type="radio" id="{}_{}" name="{}" value="{}"{} /> {}</label>"#,
                    escape_attr(&snap.field_id(&descriptor.name)),
                    escape_attr(value),
                    escape_attr(&snap.field_name(&descriptor.name)),
                    escape_attr(value),
                    if checked { " checked" } else { "" },
                    escape_html(label),
                ));
            }
            html
        })
    }

    /// `<select>` over `(value, label)` options.
    pub fn select(options: &'static [(&'static str, &'static str)]) -> FieldRenderer {
        Box::new(move |descriptor, snap| {
            let mut html = format!(
                r#"<select id="{}" name="{}">"#,
                escape_attr(&snap.field_id(&descriptor.name)),
                escape_attr(&snap.field_name(&descriptor.name)),
            );
            for (value, label) in options {
                let selected = snap.is_selected(Selection::Field(&descriptor.name), *value);
                html.push_str(&format!(
                    r#"<option value="{}"{}>{}</option>"#,
                    escape_attr(value),
                    if selected { " selected" } else { "" },
                    escape_html(label),
                ));
            }
            html.push_str("</select>");
            html
        })
    }
}

// ============================================
// Escaping
// ============================================

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_html(s).replace('"', "&quot;").replace('\'', "&#39;")
}

// ============================================
// Module Tests
// ============================================
