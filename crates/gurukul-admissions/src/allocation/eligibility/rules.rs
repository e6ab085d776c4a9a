use super::super::domain::{Class, Student};
use super::reason::IneligibilityReason;

pub(crate) type Rule = fn(&Student, &Class) -> Option<IneligibilityReason>;

pub(crate) const RULES: [Rule; 6] = [
    minimum_age,
    maximum_age,
    fee_paid,
    minimum_score,
    prerequisites,
    student_type,
];

fn minimum_age(student: &Student, class: &Class) -> Option<IneligibilityReason> {
    let min_age = class.min_age?;
    let age = student.age?;
    (age < min_age).then_some(IneligibilityReason::AgeBelowMinimum {
        age,
        min_age,
    })
}

fn maximum_age(student: &Student, class: &Class) -> Option<IneligibilityReason> {
    let max_age = class.max_age?;
    let age = student.age?;
    (age > max_age).then_some(IneligibilityReason::AgeAboveMaximum {
        age,
        max_age,
    })
}

fn fee_paid(student: &Student, class: &Class) -> Option<IneligibilityReason> {
    (class.fee_required && !student.fee_paid).then_some(IneligibilityReason::FeeNotPaid)
}

// A missing score on either side skips the rule.
fn minimum_score(student: &Student, class: &Class) -> Option<IneligibilityReason> {
    let min_score = class.min_score?;
    let score = student.test_score?;
    (score < min_score).then_some(IneligibilityReason::TestScoreBelowMinimum { score, min_score })
}

fn prerequisites(student: &Student, class: &Class) -> Option<IneligibilityReason> {
    let missing: Vec<String> = class
        .prerequisites
        .difference(&student.completed_courses)
        .cloned()
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(IneligibilityReason::MissingPrerequisites { missing })
    }
}

fn student_type(student: &Student, class: &Class) -> Option<IneligibilityReason> {
    let allowed = class.student_type_restrictions.as_ref()?;
    if allowed.contains(&student.student_type) {
        None
    } else {
        Some(IneligibilityReason::StudentTypeNotAllowed {
            student_type: student.student_type.clone(),
        })
    }
}
