use serde::Serialize;

use crate::allocation::domain::ClassId;
use crate::allocation::{AllocationOutcome, ApplicationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityLine {
    pub class_id: ClassId,
    pub filled: u32,
    pub capacity: u32,
    pub remaining: u32,
}

impl CapacityLine {
    pub fn render(&self) -> String {
        format!(
            "Class {:>3}: {:>2}/{:>2} filled ({} left)",
            self.class_id.0, self.filled, self.capacity, self.remaining
        )
    }
}

/// Console-facing digest of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationSummary {
    pub total_assignments: usize,
    pub approved: usize,
    pub waitlisted: usize,
    pub ineligible: usize,
    pub dropped_preferences: usize,
    pub capacity: Vec<CapacityLine>,
}

impl AllocationSummary {
    pub fn from_outcome(outcome: &AllocationOutcome) -> Self {
        let capacity = outcome
            .ledger
            .snapshot()
            .into_iter()
            .map(|entry| CapacityLine {
                class_id: entry.class_id,
                filled: entry.filled,
                capacity: entry.capacity,
                remaining: entry.remaining,
            })
            .collect();

        Self {
            total_assignments: outcome.enrollments.len(),
            approved: outcome.count_status(ApplicationStatus::Approved),
            waitlisted: outcome.count_status(ApplicationStatus::Waitlist),
            ineligible: outcome.count_status(ApplicationStatus::Ineligible),
            dropped_preferences: outcome.dropped.len(),
            capacity,
        }
    }

    pub fn not_placed(&self) -> usize {
        self.waitlisted + self.ineligible
    }
}
