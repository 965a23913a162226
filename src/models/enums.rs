use serde::{Deserialize, Serialize};

/// Patient gender as reported on the assessment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }

    /// Fixed ordinal shared with the trained model. Changing these
    /// invalidates the fitted scaler and the model weights.
    pub fn encoded(self) -> f32 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
            Gender::Other => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

impl SmokingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SmokingStatus::Never => "never",
            SmokingStatus::Former => "former",
            SmokingStatus::Current => "current",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "never" => Some(SmokingStatus::Never),
            "former" => Some(SmokingStatus::Former),
            "current" => Some(SmokingStatus::Current),
            _ => None,
        }
    }

    pub fn encoded(self) -> f32 {
        match self {
            SmokingStatus::Never => 0.0,
            SmokingStatus::Former => 1.0,
            SmokingStatus::Current => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholUse {
    Never,
    Occasional,
    Moderate,
    Heavy,
}

impl AlcoholUse {
    pub fn as_str(self) -> &'static str {
        match self {
            AlcoholUse::Never => "never",
            AlcoholUse::Occasional => "occasional",
            AlcoholUse::Moderate => "moderate",
            AlcoholUse::Heavy => "heavy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "never" => Some(AlcoholUse::Never),
            "occasional" => Some(AlcoholUse::Occasional),
            "moderate" => Some(AlcoholUse::Moderate),
            "heavy" => Some(AlcoholUse::Heavy),
            _ => None,
        }
    }

    pub fn encoded(self) -> f32 {
        match self {
            AlcoholUse::Never => 0.0,
            AlcoholUse::Occasional => 1.0,
            AlcoholUse::Moderate => 2.0,
            AlcoholUse::Heavy => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseLevel {
    Sedentary,
    Light,
    Moderate,
    Vigorous,
}

impl ExerciseLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseLevel::Sedentary => "sedentary",
            ExerciseLevel::Light => "light",
            ExerciseLevel::Moderate => "moderate",
            ExerciseLevel::Vigorous => "vigorous",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sedentary" => Some(ExerciseLevel::Sedentary),
            "light" => Some(ExerciseLevel::Light),
            "moderate" => Some(ExerciseLevel::Moderate),
            "vigorous" => Some(ExerciseLevel::Vigorous),
            _ => None,
        }
    }

    pub fn encoded(self) -> f32 {
        match self {
            ExerciseLevel::Sedentary => 0.0,
            ExerciseLevel::Light => 1.0,
            ExerciseLevel::Moderate => 2.0,
            ExerciseLevel::Vigorous => 3.0,
        }
    }
}
