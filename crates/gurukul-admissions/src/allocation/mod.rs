//! Student-to-class allocation: eligibility rules, preference ranking, the
//! capacity ledger, and the greedy per-school allocation pass.

pub mod domain;
pub mod eligibility;
pub mod engine;
pub mod intake;
pub mod ledger;
pub mod ranking;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{
    tag_set, Application, ApplicationStatus, ApplicationStatusUpdate, Class, ClassId, Enrollment,
    EnrollmentId, EnrollmentStatus, Preference, RejectionRecord, SchoolId, Student, StudentId,
};
pub use eligibility::{evaluate, Eligibility, IneligibilityReason};
pub use engine::{
    AllocationEngine, AllocationOutcome, AllocationPolicy, EligibilityAudit, NO_CAPACITY_REASON,
    NO_ELIGIBLE_PREFERENCE_REASON,
};
pub use intake::{AdmissionsDataset, Candidate, DropReason, DroppedPreference, Intake};
pub use ledger::{CapacityEntry, CapacityError, CapacityLedger};
pub use ranking::{rank_candidates, StudentQueue};
pub use router::allocation_router;
