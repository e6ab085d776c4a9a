use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    Application, Class, ClassId, Preference, SchoolId, Student, StudentId,
};
use super::eligibility::{evaluate, Eligibility};

/// The four record sets consumed by a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionsDataset {
    pub students: Vec<Student>,
    pub classes: Vec<Class>,
    pub preferences: Vec<Preference>,
    pub applications: Vec<Application>,
}

/// A preference joined with the records it refers to.
///
/// `class` is `None` when the preference names a class missing from the
/// class table. Such a candidate carries no constraints and never has a seat.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub school_id: SchoolId,
    pub student: &'a Student,
    pub class_id: ClassId,
    pub class: Option<&'a Class>,
    pub preference: &'a Preference,
}

impl Candidate<'_> {
    pub fn class_listed(&self) -> bool {
        self.class.is_some()
    }

    pub fn eligibility(&self) -> Eligibility {
        self.class
            .map_or(Eligibility::Eligible, |class| evaluate(self.student, class))
    }
}

/// Why a preference row could not take part in allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    UnknownStudent,
    MissingApplication,
}

impl DropReason {
    pub const fn label(self) -> &'static str {
        match self {
            DropReason::UnknownStudent => "student not found",
            DropReason::MissingApplication => "no school application",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedPreference {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub reason: DropReason,
}

/// Joined candidates in input order plus the rows that were filtered out.
#[derive(Debug, Default)]
pub struct Intake<'a> {
    pub candidates: Vec<Candidate<'a>>,
    pub dropped: Vec<DroppedPreference>,
}

impl AdmissionsDataset {
    /// Joins every preference to its student, class, and school.
    ///
    /// Preferences for unknown students or students without an application are
    /// dropped. Preferences for unknown classes are kept without class data.
    /// Duplicate student, class, or application rows keep their first occurrence.
    pub fn join(&self) -> Intake<'_> {
        let students = first_by_key(&self.students, |student| student.id);
        let classes = first_by_key(&self.classes, |class| class.id);
        let schools = first_by_key(&self.applications, |application| application.student_id);

        if schools.len() < self.applications.len() {
            warn!(
                duplicates = self.applications.len() - schools.len(),
                "ignoring repeated applications; each student applies through one school"
            );
        }

        let mut intake = Intake::default();
        let mut unlisted = 0usize;
        for preference in &self.preferences {
            let joined = students
                .get(&preference.student_id)
                .ok_or(DropReason::UnknownStudent)
                .and_then(|student| {
                    schools
                        .get(&preference.student_id)
                        .map(|application| (*student, application.school_id))
                        .ok_or(DropReason::MissingApplication)
                });

            match joined {
                Ok((student, school_id)) => {
                    let class = classes.get(&preference.class_id).copied();
                    if class.is_none() {
                        unlisted += 1;
                    }
                    intake.candidates.push(Candidate {
                        school_id,
                        student,
                        class_id: preference.class_id,
                        class,
                        preference,
                    });
                }
                Err(reason) => intake.dropped.push(DroppedPreference {
                    student_id: preference.student_id,
                    class_id: preference.class_id,
                    reason,
                }),
            }
        }

        if unlisted > 0 {
            warn!(
                preferences = unlisted,
                "preferences name classes missing from the class table; they have no seats"
            );
        }

        if !intake.dropped.is_empty() {
            warn!(
                dropped = intake.dropped.len(),
                "preferences excluded before allocation"
            );
        }

        intake
    }
}

fn first_by_key<T, K, F>(rows: &[T], key: F) -> HashMap<K, &T>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(key(row)).or_insert(row);
    }
    index
}
