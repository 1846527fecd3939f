//! Submission Sanitizer
//!
//! Transforms a submitted settings mapping before it is persisted. The
//! default sanitizer is the identity; per-field rules may coerce values or
//! emit advisories. Advisories are reported to the operator but never
//! block the write: the returned record is persisted verbatim.

use crate::record::{SettingValue, SettingsRecord};

use serde::Serialize;

// ============================================
// Advisories
// ============================================

/// A validation finding surfaced to the operator alongside a successful
/// write.
#[derive(Debug, Clone, Serialize)]
pub struct Advisory {
    pub field: String,
    pub message: String,
}

/// Result of sanitizing one submission: the record to persist (same shape
/// as the submission) plus any advisories raised along the way.
#[derive(Debug, Clone)]
pub struct SanitizeOutcome {
    pub record: SettingsRecord,
    pub advisories: Vec<Advisory>,
}

// ============================================
// Rules
// ============================================

/// What a rule decided about one submitted value.
pub enum RuleOutcome {
    /// Value passes as submitted.
    Keep,
    /// Value is replaced before persisting.
    Coerce(SettingValue),
    /// Value is flagged for the operator; an optional replacement is
    /// persisted, otherwise the submitted value stands.
    Advise {
        message: String,
        replacement: Option<SettingValue>,
    },
}

pub type SanitizeRule = Box<dyn Fn(&SettingValue) -> RuleOutcome + Send + Sync>;

/// Ordered per-field sanitize rules over one submission.
#[derive(Default)]
pub struct Sanitizer {
    rules: Vec<(String, SanitizeRule)>,
}

impl Sanitizer {
    /// Identity sanitizer: every submission persists as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a rule to a field. Rules run in registration order; a field
    /// may carry several.
    pub fn rule(mut self, field: impl Into<String>, rule: SanitizeRule) -> Self {
        self.rules.push((field.into(), rule));
        self
    }

    /// Apply all rules to a submission.
    ///
    /// Fields without rules, and fields absent from the submission, pass
    /// through untouched, so the output always has the submission's shape.
    pub fn sanitize(&self, submitted: SettingsRecord) -> SanitizeOutcome {
        let mut record = submitted;
        let mut advisories = Vec::new();

        for (field, rule) in &self.rules {
            let Some(current) = record.get(field).cloned() else {
                continue;
            };

            match rule(&current) {
                RuleOutcome::Keep => {}
                RuleOutcome::Coerce(value) => {
                    record.insert(field.clone(), value);
                }
                RuleOutcome::Advise {
                    message,
                    replacement,
                } => {
                    advisories.push(Advisory {
                        field: field.clone(),
                        message,
                    });
                    if let Some(value) = replacement {
                        record.insert(field.clone(), value);
                    }
                }
            }
        }

        SanitizeOutcome { record, advisories }
    }
}

// ============================================
// Built-in Rules
// ============================================

/// Rule constructors for the common field shapes.
pub mod rules {
    use super::*;

    /// Trim surrounding whitespace from text values.
    pub fn trimmed() -> SanitizeRule {
        Box::new(|value| match value {
            SettingValue::Text(s) => {
                let t = s.trim();
                if t == s {
                    RuleOutcome::Keep
                } else {
                    RuleOutcome::Coerce(SettingValue::Text(t.to_string()))
                }
            }
            _ => RuleOutcome::Keep,
        })
    }

    /// Advise when the canonical value is not in the allowed set.
    pub fn one_of(allowed: &'static [&'static str]) -> SanitizeRule {
        Box::new(move |value| {
            if allowed.contains(&value.canonical().as_str()) {
                RuleOutcome::Keep
            } else {
                RuleOutcome::Advise {
                    message: format!(
                        "Value '{}' is not one of: {}",
                        value.canonical(),
                        allowed.join(", ")
                    ),
                    replacement: None,
                }
            }
        })
    }

    /// Normalize any truthy value to `"1"` and anything else to `"0"`.
    pub fn flag() -> SanitizeRule {
        Box::new(|value| {
            let truthy = matches!(
                value.canonical().as_str(),
                "1" | "true" | "on" | "yes"
            );
            let normalized = SettingValue::Text(if truthy { "1" } else { "0" }.to_string());
            if value == &normalized {
                RuleOutcome::Keep
            } else {
                RuleOutcome::Coerce(normalized)
            }
        })
    }

    /// Advise when a value does not parse as an integer within bounds.
    pub fn int_range(min: i64, max: i64) -> SanitizeRule {
        Box::new(move |value| match value.canonical().parse::<i64>() {
            Ok(n) if n >= min && n <= max => RuleOutcome::Keep,
            Ok(n) => RuleOutcome::Advise {
                message: format!("Value {} is outside {}..={}", n, min, max),
                replacement: None,
            },
            Err(_) => RuleOutcome::Advise {
                message: format!("Value '{}' is not an integer", value.canonical()),
                replacement: None,
            },
        })
    }
}

// ============================================
// Module Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(pairs: &[(&str, &str)]) -> SettingsRecord {
        let mut record = SettingsRecord::new();
        for (k, v) in pairs {
            record.insert(*k, *v);
        }
        record
    }

    #[test]
    fn test_default_sanitizer_is_identity() {
        let sanitizer = Sanitizer::new();
        let submitted = submission(&[("text_field", "  Hello  "), ("h_radio_field", "1")]);

        let outcome = sanitizer.sanitize(submitted.clone());
        assert_eq!(outcome.record, submitted);
        assert!(outcome.advisories.is_empty());
    }

    #[test]
    fn test_trimmed_coerces_text() {
        let sanitizer = Sanitizer::new().rule("text_field", rules::trimmed());
        let outcome = sanitizer.sanitize(submission(&[("text_field", "  Hello  ")]));

        assert_eq!(
            outcome.record.get("text_field"),
            Some(&SettingValue::Text("Hello".into()))
        );
        assert!(outcome.advisories.is_empty());
    }

    #[test]
    fn test_advisory_does_not_block_the_write() {
        let sanitizer = Sanitizer::new().rule("h_radio_field", rules::one_of(&["1", "2", "3"]));
        let outcome = sanitizer.sanitize(submission(&[("h_radio_field", "9")]));

        // The out-of-range value persists; the finding is advisory only.
        assert_eq!(
            outcome.record.get("h_radio_field"),
            Some(&SettingValue::Text("9".into()))
        );
        assert_eq!(outcome.advisories.len(), 1);
        assert_eq!(outcome.advisories[0].field, "h_radio_field");
    }

    #[test]
    fn test_rules_skip_absent_fields() {
        let sanitizer = Sanitizer::new().rule("text_field", rules::trimmed());
        let outcome = sanitizer.sanitize(submission(&[("other_field", "x")]));

        assert_eq!(outcome.record, submission(&[("other_field", "x")]));
        assert!(outcome.advisories.is_empty());
    }

    #[test]
    fn test_flag_normalizes_truthy_values() {
        let sanitizer = Sanitizer::new().rule("checkbox_field", rules::flag());

        let outcome = sanitizer.sanitize(submission(&[("checkbox_field", "on")]));
        assert_eq!(
            outcome.record.get("checkbox_field"),
            Some(&SettingValue::Text("1".into()))
        );

        let outcome = sanitizer.sanitize(submission(&[("checkbox_field", "")]));
        assert_eq!(
            outcome.record.get("checkbox_field"),
            Some(&SettingValue::Text("0".into()))
        );
    }

    #[test]
    fn test_int_range_advises_on_garbage() {
        let sanitizer = Sanitizer::new().rule("count_field", rules::int_range(1, 10));

        let outcome = sanitizer.sanitize(submission(&[("count_field", "abc")]));
        assert_eq!(outcome.advisories.len(), 1);

        let outcome = sanitizer.sanitize(submission(&[("count_field", "5")]));
        assert!(outcome.advisories.is_empty());
    }

    #[test]
    fn test_sanitize_is_idempotent_on_its_own_output() {
        let sanitizer = Sanitizer::new()
            .rule("text_field", rules::trimmed())
            .rule("checkbox_field", rules::flag())
            .rule("h_radio_field", rules::one_of(&["1", "2", "3"]));

        let submitted = submission(&[
            ("text_field", "  Hello  "),
            ("checkbox_field", "on"),
            ("h_radio_field", "9"),
        ]);

        let once = sanitizer.sanitize(submitted);
        let twice = sanitizer.sanitize(once.record.clone());
        assert_eq!(twice.record, once.record);
    }
}
