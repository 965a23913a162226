//! Plausibility validation of parsed values.
//!
//! Out-of-range values are retained with downgraded confidence and an
//! explanatory note rather than dropped: a flagged value a clinician
//! can review beats silently discarded data.

use std::collections::BTreeMap;

use crate::models::extraction::ExtractedField;

/// Confidence assigned to a value outside its plausible range.
pub const OUT_OF_RANGE_CONFIDENCE: f32 = 0.3;

/// Fields injected with defaults when the report does not carry them.
pub const DEFAULT_FIELDS: [&str; 2] = ["stress_level", "sleep_hours"];

/// Plausible clinical ranges, inclusive on both ends.
const PLAUSIBLE_RANGES: [(&str, f64, f64); 12] = [
    ("systolic_bp", 70.0, 250.0),
    ("diastolic_bp", 40.0, 150.0),
    ("fasting_glucose", 70.0, 500.0),
    ("hba1c", 4.0, 15.0),
    ("total_cholesterol", 100.0, 400.0),
    ("hdl_cholesterol", 20.0, 100.0),
    ("ldl_cholesterol", 50.0, 300.0),
    ("triglycerides", 50.0, 1000.0),
    ("heart_rate", 40.0, 200.0),
    ("temperature", 30.0, 45.0),
    ("creatinine", 0.3, 5.0),
    ("hemoglobin", 8.0, 20.0),
];

/// Flag implausible values in place.
pub fn validate_fields(fields: &mut BTreeMap<String, ExtractedField>) {
    for (name, field) in fields.iter_mut() {
        let Some(&(_, lo, hi)) = PLAUSIBLE_RANGES.iter().find(|(n, _, _)| n == name) else {
            continue;
        };
        if field.value < lo || field.value > hi {
            tracing::warn!(
                field = %name,
                value = field.value,
                "Value outside plausible range [{lo}, {hi}]"
            );
            field.confidence = OUT_OF_RANGE_CONFIDENCE;
            field.note = Some(format!("Value outside normal range ({lo}-{hi})"));
        }
    }
}

/// Inject wellness defaults so the downstream form always has values
/// to pre-fill. Marked as defaults for the caller.
pub fn inject_defaults(fields: &mut BTreeMap<String, ExtractedField>) {
    for (name, value) in [("stress_level", 5.0), ("sleep_hours", 7.0)] {
        fields.entry(name.to_string()).or_insert_with(|| ExtractedField {
            value,
            unit: String::new(),
            confidence: 1.0,
            raw_line: "Default value".to_string(),
            note: Some("default value".to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: f64) -> ExtractedField {
        ExtractedField {
            value,
            unit: "mg/dL".into(),
            confidence: 0.9,
            raw_line: "Glucose: test".into(),
            note: None,
        }
    }

    #[test]
    fn in_range_value_untouched() {
        let mut fields = BTreeMap::new();
        fields.insert("fasting_glucose".to_string(), field(110.0));
        validate_fields(&mut fields);
        let glucose = &fields["fasting_glucose"];
        assert_eq!(glucose.confidence, 0.9);
        assert!(glucose.note.is_none());
    }

    #[test]
    fn out_of_range_value_kept_but_flagged() {
        let mut fields = BTreeMap::new();
        fields.insert("fasting_glucose".to_string(), field(650.0));
        validate_fields(&mut fields);
        let glucose = &fields["fasting_glucose"];
        assert_eq!(glucose.value, 650.0);
        assert_eq!(glucose.confidence, OUT_OF_RANGE_CONFIDENCE);
        assert!(glucose
            .note
            .as_deref()
            .unwrap()
            .contains("outside normal range"));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut fields = BTreeMap::new();
        fields.insert("heart_rate".to_string(), field(40.0));
        fields.insert("temperature".to_string(), field(45.0));
        validate_fields(&mut fields);
        assert_eq!(fields["heart_rate"].confidence, 0.9);
        assert_eq!(fields["temperature"].confidence, 0.9);
    }

    #[test]
    fn unknown_fields_pass_validation() {
        let mut fields = BTreeMap::new();
        fields.insert("stress_level".to_string(), field(99.0));
        validate_fields(&mut fields);
        assert_eq!(fields["stress_level"].confidence, 0.9);
    }

    #[test]
    fn defaults_injected_when_absent() {
        let mut fields = BTreeMap::new();
        inject_defaults(&mut fields);
        assert_eq!(fields["stress_level"].value, 5.0);
        assert_eq!(fields["sleep_hours"].value, 7.0);
        assert_eq!(fields["stress_level"].confidence, 1.0);
        assert_eq!(fields["sleep_hours"].raw_line, "Default value");
        assert_eq!(fields["sleep_hours"].note.as_deref(), Some("default value"));
    }

    #[test]
    fn parsed_values_not_overwritten_by_defaults() {
        let mut fields = BTreeMap::new();
        fields.insert("sleep_hours".to_string(), field(6.0));
        inject_defaults(&mut fields);
        assert_eq!(fields["sleep_hours"].value, 6.0);
        assert_eq!(fields["stress_level"].value, 5.0);
    }
}
