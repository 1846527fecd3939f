//! Settings Record and Values
//!
//! Data structures for the persisted settings mapping: one record per
//! plugin namespace, holding scalar values keyed by field name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================
// Setting Values
// ============================================

/// A single scalar setting value.
///
/// Form submissions arrive as strings, API clients may send JSON numbers
/// or booleans; all three shapes are stored as submitted and compared
/// through one explicit normalization rule (see [`SettingValue::canonical`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Int(i64),
    Text(String),
}

impl SettingValue {
    /// Canonical string form used for loose equality.
    ///
    /// Integers render as decimal, flags as `"1"` / `"0"`, text as itself.
    /// This makes a stored `"1"` match a submitted `1` or `true` and keeps
    /// the comparison rule deterministic across value shapes.
    pub fn canonical(&self) -> String {
        match self {
            SettingValue::Flag(true) => "1".to_string(),
            SettingValue::Flag(false) => "0".to_string(),
            SettingValue::Int(n) => n.to_string(),
            SettingValue::Text(s) => s.clone(),
        }
    }

    /// Loose equality: both operands normalize to their canonical string.
    pub fn loosely_matches(&self, other: &SettingValue) -> bool {
        self.canonical() == other.canonical()
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        SettingValue::Int(n)
    }
}

impl From<i32> for SettingValue {
    fn from(n: i32) -> Self {
        SettingValue::Int(n as i64)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Flag(b)
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

// ============================================
// Settings Record
// ============================================

/// The persisted settings mapping for one plugin namespace.
///
/// Absent records read as empty; saves replace the whole mapping. The
/// ordered map keeps the serialized blob stable across round trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsRecord(BTreeMap<String, SettingValue>);

impl SettingsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SettingValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, SettingValue)> for SettingsRecord {
    fn from_iter<I: IntoIterator<Item = (String, SettingValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================
// Module Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_equality_across_shapes() {
        assert!(SettingValue::Text("1".into()).loosely_matches(&SettingValue::Int(1)));
        assert!(SettingValue::Flag(true).loosely_matches(&SettingValue::Text("1".into())));
        assert!(SettingValue::Flag(false).loosely_matches(&SettingValue::Int(0)));
        assert!(!SettingValue::Text("1".into()).loosely_matches(&SettingValue::Int(0)));
        assert!(!SettingValue::Text("01".into()).loosely_matches(&SettingValue::Int(1)));
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let v: SettingValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(v, SettingValue::Text("hello".into()));

        let v: SettingValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, SettingValue::Int(42));

        let v: SettingValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, SettingValue::Flag(true));
    }

    #[test]
    fn test_record_round_trips_as_plain_map() {
        let mut record = SettingsRecord::new();
        record.insert("text_field", "Hello");
        record.insert("h_radio_field", "1");

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"h_radio_field":"1","text_field":"Hello"}"#);

        let back: SettingsRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_absent_record_reads_empty() {
        let record = SettingsRecord::new();
        assert!(record.is_empty());
        assert!(record.get("anything").is_none());
    }
}
