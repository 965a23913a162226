//! Clinical record → fixed-order feature vector.
//!
//! The ordering here is a three-way contract between this encoder, the
//! fitted scaler, and the trained model. Reordering or adding features
//! invalidates all three; the training job writes the same list to
//! `feature_names.json` and the artifact loader cross-checks it.

use ndarray::Array1;

use crate::models::assessment::AssessmentRecord;
use crate::models::enums::{AlcoholUse, ExerciseLevel, Gender, SmokingStatus};

pub const NUMERIC_FEATURES: [&str; 16] = [
    "age",
    "bmi",
    "systolic_bp",
    "diastolic_bp",
    "heart_rate",
    "temperature",
    "total_cholesterol",
    "hdl_cholesterol",
    "ldl_cholesterol",
    "triglycerides",
    "fasting_glucose",
    "hba1c",
    "creatinine",
    "hemoglobin",
    "stress_level",
    "sleep_hours",
];

pub const CATEGORICAL_FEATURES: [&str; 5] = [
    "gender",
    "smoking_status",
    "alcohol_consumption",
    "exercise_level",
    "family_medical_history",
];

pub const BINARY_FEATURES: [&str; 9] = [
    "chest_pain",
    "shortness_of_breath",
    "fatigue",
    "frequent_urination",
    "excessive_thirst",
    "unexplained_weight_loss",
    "blurred_vision",
    "dizziness",
    "palpitations",
];

pub const FEATURE_COUNT: usize =
    NUMERIC_FEATURES.len() + CATEGORICAL_FEATURES.len() + BINARY_FEATURES.len();

/// Full feature ordering: numeric, then categorical, then binary.
pub fn feature_names() -> Vec<&'static str> {
    NUMERIC_FEATURES
        .iter()
        .chain(CATEGORICAL_FEATURES.iter())
        .chain(BINARY_FEATURES.iter())
        .copied()
        .collect()
}

/// Encode a record into the fixed-width vector. Missing or malformed
/// values degrade to 0 for their slot; this function cannot fail.
pub fn encode(record: &AssessmentRecord) -> Array1<f32> {
    let mut features = Vec::with_capacity(FEATURE_COUNT);

    for name in NUMERIC_FEATURES {
        features.push(record.number(name).unwrap_or(0.0) as f32);
    }

    for name in CATEGORICAL_FEATURES {
        features.push(encode_categorical(record, name));
    }

    for name in BINARY_FEATURES {
        features.push(if record.flag(name) { 1.0 } else { 0.0 });
    }

    Array1::from(features)
}

fn encode_categorical(record: &AssessmentRecord, name: &str) -> f32 {
    if name == "family_medical_history" {
        return record.family_history().encoded();
    }

    let Some(value) = record.text(name) else {
        return 0.0;
    };

    match name {
        "gender" => Gender::from_str(value).map(Gender::encoded),
        "smoking_status" => SmokingStatus::from_str(value).map(SmokingStatus::encoded),
        "alcohol_consumption" => AlcoholUse::from_str(value).map(AlcoholUse::encoded),
        "exercise_level" => ExerciseLevel::from_str(value).map(ExerciseLevel::encoded),
        _ => None,
    }
    .unwrap_or(0.0)
}
