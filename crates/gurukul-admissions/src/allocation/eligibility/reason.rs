use serde::{Deserialize, Serialize};

/// Verdict for a single (student, class) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Eligibility {
    Eligible,
    Ineligible(IneligibilityReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn reason(&self) -> String {
        match self {
            Eligibility::Eligible => "Eligible".to_string(),
            Eligibility::Ineligible(reason) => reason.summary(),
        }
    }
}

/// First rule a student failed for a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IneligibilityReason {
    AgeBelowMinimum { age: u32, min_age: u32 },
    AgeAboveMaximum { age: u32, max_age: u32 },
    FeeNotPaid,
    TestScoreBelowMinimum { score: f64, min_score: f64 },
    MissingPrerequisites { missing: Vec<String> },
    StudentTypeNotAllowed { student_type: String },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::AgeBelowMinimum { .. } => "Age below minimum".to_string(),
            IneligibilityReason::AgeAboveMaximum { .. } => "Age above maximum".to_string(),
            IneligibilityReason::FeeNotPaid => "Fee not paid".to_string(),
            IneligibilityReason::TestScoreBelowMinimum { .. } => {
                "Test score below minimum".to_string()
            }
            IneligibilityReason::MissingPrerequisites { .. } => {
                "Missing prerequisite(s)".to_string()
            }
            IneligibilityReason::StudentTypeNotAllowed { student_type } => {
                format!("Type '{student_type}' not allowed")
            }
        }
    }
}
