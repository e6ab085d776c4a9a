use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for enrolled and applying students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for classes. Classes are not scoped to a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u32);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for schools. Schools are processed in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolId(pub u32);

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generated enrollment identifier such as `E1001`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(pub String);

impl EnrollmentId {
    pub fn sequential(counter: u64) -> Self {
        Self(format!("E{counter:04}"))
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Applicant attributes consulted by the eligibility rules.
///
/// A student without a recorded age is not held to age bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub fee_paid: bool,
    #[serde(default)]
    pub test_score: Option<f64>,
    #[serde(default)]
    pub completed_courses: BTreeSet<String>,
    pub student_type: String,
}

/// Class offering with its seat count and admission constraints.
///
/// Optional fields impose no constraint when absent. A missing capacity
/// means no seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub min_age: Option<u32>,
    #[serde(default)]
    pub max_age: Option<u32>,
    #[serde(default)]
    pub fee_required: bool,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub prerequisites: BTreeSet<String>,
    #[serde(default)]
    pub student_type_restrictions: Option<BTreeSet<String>>,
}

/// Ranked request by a student for a class; lower rank wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub rank: u32,
    pub submission_date: NaiveDateTime,
}

/// Links a student to the single school they apply through for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub student_id: StudentId,
    pub school_id: SchoolId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Enrolled,
}

/// Seat granted to a student. Never mutated once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub enrollment_date: NaiveDate,
    pub status: EnrollmentStatus,
}

/// Outcome recorded against a processed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Approved,
    Waitlist,
    Ineligible,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Waitlist => "Waitlist",
            ApplicationStatus::Ineligible => "Ineligible",
        }
    }
}

/// Status row emitted exactly once per processed student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatusUpdate {
    pub student_id: StudentId,
    pub school_id: SchoolId,
    pub status: ApplicationStatus,
    pub class_id: Option<ClassId>,
    pub assigned_date: Option<NaiveDate>,
}

/// Audit row for a student who was not placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub student_id: StudentId,
    pub reason: String,
}

/// Parses a comma separated tag or course list into a set.
///
/// Elements are trimmed and blanks discarded, so `"math, art,"` yields
/// `{"art", "math"}`.
pub fn tag_set(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_set_ignores_whitespace_and_blanks() {
        let tags = tag_set(" MATH101 ,SCI100,, ");
        assert_eq!(
            tags.into_iter().collect::<Vec<_>>(),
            vec!["MATH101".to_string(), "SCI100".to_string()]
        );
        assert!(tag_set("   ").is_empty());
    }

    #[test]
    fn enrollment_ids_are_zero_padded() {
        assert_eq!(EnrollmentId::sequential(7).0, "E0007");
        assert_eq!(EnrollmentId::sequential(1001).0, "E1001");
        assert_eq!(EnrollmentId::sequential(12345).0, "E12345");
    }
}
