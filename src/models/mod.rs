pub mod assessment;
pub mod enums;
pub mod extraction;
pub mod prediction;

pub use assessment::{AssessmentRecord, FamilyHistory};
pub use enums::{AlcoholUse, ExerciseLevel, Gender, SmokingStatus};
pub use extraction::{ExtractedField, ReportExtraction, ReportKind};
pub use prediction::{PredictionResult, Priority, Recommendation, RiskCategory, RiskScores};
