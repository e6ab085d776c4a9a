mod reason;
mod rules;

pub use reason::{Eligibility, IneligibilityReason};

use super::domain::{Class, Student};

/// Decides whether `student` may be admitted to `class`.
///
/// Rules run in a fixed order and stop at the first failure, so the returned
/// reason always names the earliest rule that rejected the pair. Absent
/// optional fields on either side never disqualify.
pub fn evaluate(student: &Student, class: &Class) -> Eligibility {
    rules::RULES
        .iter()
        .find_map(|rule| rule(student, class))
        .map_or(Eligibility::Eligible, Eligibility::Ineligible)
}
