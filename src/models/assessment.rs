use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One health assessment as submitted by the web form or API payload.
///
/// The payload is a flat key→value map of mixed types. No field is
/// required; every reader degrades to a documented default, so a partial
/// or malformed submission still produces a usable record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentRecord(Map<String, Value>);

impl AssessmentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an arbitrary JSON value. Anything that is not an
    /// object becomes an empty record (every field defaulted).
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric read. Textual values are parsed, booleans coerce to 0/1,
    /// anything else is `None`.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Truthy coercion for symptom flags: real booleans, nonzero
    /// numbers, and the strings "true"/"1"/"yes"/"on" count as set.
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Some(Value::String(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
            }
            _ => false,
        }
    }

    /// Family medical history arrives in one of two shapes: a named
    /// category string, or a map of condition→bool flags. Both collapse
    /// to the same ordinal scale via [`FamilyHistory::encoded`].
    pub fn family_history(&self) -> FamilyHistory {
        match self.0.get("family_medical_history") {
            Some(Value::String(s)) => FamilyHistory::Named(s.clone()),
            Some(Value::Object(map)) => {
                let flags = map
                    .iter()
                    .map(|(k, v)| (k.clone(), matches!(v, Value::Bool(true))))
                    .collect();
                FamilyHistory::Flags(flags)
            }
            _ => FamilyHistory::Unspecified,
        }
    }
}

/// The two accepted shapes of family medical history, normalized to one
/// ordinal scale at the encoder boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyHistory {
    /// String form: none / heart_disease / diabetes / cancer / multiple.
    Named(String),
    /// Flag form: condition name → present in family history.
    Flags(BTreeMap<String, bool>),
    Unspecified,
}

impl FamilyHistory {
    /// Ordinal shared with the trained model:
    /// 0 none, 1 heart disease, 2 diabetes, 3 cancer, 4 multiple.
    ///
    /// Flag form counts the set conditions: zero → none, exactly one →
    /// that condition's ordinal (unrecognized single conditions map to
    /// 1), two or more → multiple.
    pub fn encoded(&self) -> f32 {
        match self {
            FamilyHistory::Unspecified => 0.0,
            FamilyHistory::Named(s) => match s.as_str() {
                "heart_disease" => 1.0,
                "diabetes" => 2.0,
                "cancer" => 3.0,
                "multiple" => 4.0,
                _ => 0.0,
            },
            FamilyHistory::Flags(flags) => {
                let set: Vec<&str> = flags
                    .iter()
                    .filter(|(_, &v)| v)
                    .map(|(k, _)| k.as_str())
                    .collect();
                match set.len() {
                    0 => 0.0,
                    1 => match set[0] {
                        "heart_disease" => 1.0,
                        "diabetes" => 2.0,
                        "cancer" => 3.0,
                        _ => 1.0,
                    },
                    _ => 4.0,
                }
            }
        }
    }

    /// Whether the history carries elevated cancer risk (cancer itself
    /// or multiple conditions).
    pub fn includes_cancer(&self) -> bool {
        self.encoded() >= 3.0
    }
}
