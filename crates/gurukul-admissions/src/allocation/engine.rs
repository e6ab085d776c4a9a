use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{
    ApplicationStatus, ApplicationStatusUpdate, ClassId, Enrollment, EnrollmentId,
    EnrollmentStatus, RejectionRecord, SchoolId, StudentId,
};
use super::intake::{AdmissionsDataset, Candidate, DroppedPreference};
use super::ledger::{CapacityError, CapacityLedger};
use super::ranking::{queues_by_student, rank_candidates, StudentQueue};

pub const NO_CAPACITY_REASON: &str = "No available capacity in preferred classes";
pub const NO_ELIGIBLE_PREFERENCE_REASON: &str = "No eligible preferences";
pub const DEFAULT_ENROLLMENT_ID_START: u32 = 1001;

/// Knobs for a single allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPolicy {
    /// Counter value used for the first enrollment id.
    #[serde(default = "default_enrollment_id_start")]
    pub enrollment_id_start: u32,
    /// Emit an `Ineligible` status for students with no eligible preference
    /// instead of leaving them out of the status updates.
    #[serde(default)]
    pub emit_ineligible_status: bool,
}

fn default_enrollment_id_start() -> u32 {
    DEFAULT_ENROLLMENT_ID_START
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            enrollment_id_start: DEFAULT_ENROLLMENT_ID_START,
            emit_ineligible_status: false,
        }
    }
}

/// Eligibility verdict recorded for every evaluated pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityAudit {
    pub school_id: SchoolId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    /// False when the class was missing from the class table.
    pub class_listed: bool,
    pub eligible: bool,
    pub reason: String,
}

/// Everything a run emits, taken after the last school is processed.
#[derive(Debug, Clone, Default)]
pub struct AllocationOutcome {
    pub run_date: NaiveDate,
    pub enrollments: Vec<Enrollment>,
    pub status_updates: Vec<ApplicationStatusUpdate>,
    pub rejections: Vec<RejectionRecord>,
    pub eligibility_audit: Vec<EligibilityAudit>,
    pub dropped: Vec<DroppedPreference>,
    pub ledger: CapacityLedger,
}

impl AllocationOutcome {
    pub fn count_status(&self, status: ApplicationStatus) -> usize {
        self.status_updates
            .iter()
            .filter(|update| update.status == status)
            .count()
    }
}

/// Greedy first-fit allocator.
///
/// Schools are solved one at a time in ascending id order against a single
/// ledger, so a class requested from several schools fills in school order.
#[derive(Debug, Clone, Default)]
pub struct AllocationEngine {
    policy: AllocationPolicy,
}

impl AllocationEngine {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Runs a full allocation with a fresh ledger seeded from the dataset's classes.
    pub fn run(
        &self,
        dataset: &AdmissionsDataset,
        run_date: NaiveDate,
    ) -> Result<AllocationOutcome, CapacityError> {
        let mut ledger = CapacityLedger::from_classes(&dataset.classes);
        self.allocate(dataset, &mut ledger, run_date)
    }

    /// Allocates against a caller-owned ledger. The returned outcome carries a
    /// copy of the ledger as it stood when the run finished.
    pub fn allocate(
        &self,
        dataset: &AdmissionsDataset,
        ledger: &mut CapacityLedger,
        run_date: NaiveDate,
    ) -> Result<AllocationOutcome, CapacityError> {
        let intake = dataset.join();
        let mut run = RunState::new(&self.policy, run_date);
        run.outcome.dropped = intake.dropped;

        let mut schools: BTreeMap<SchoolId, Vec<Candidate<'_>>> = BTreeMap::new();
        for candidate in intake.candidates {
            schools.entry(candidate.school_id).or_default().push(candidate);
        }

        for (school_id, candidates) in schools {
            self.allocate_school(school_id, candidates, ledger, &mut run)?;
        }

        info!(
            enrollments = run.outcome.enrollments.len(),
            status_updates = run.outcome.status_updates.len(),
            rejections = run.outcome.rejections.len(),
            "allocation run complete"
        );

        run.outcome.ledger = ledger.clone();
        Ok(run.outcome)
    }

    fn allocate_school(
        &self,
        school_id: SchoolId,
        candidates: Vec<Candidate<'_>>,
        ledger: &mut CapacityLedger,
        run: &mut RunState,
    ) -> Result<(), CapacityError> {
        info!(%school_id, preferences = candidates.len(), "processing school");

        let mut applicants: Vec<StudentId> = Vec::new();
        let mut seen: HashSet<StudentId> = HashSet::new();
        let mut eligible = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let student_id = candidate.student.id;
            if seen.insert(student_id) {
                applicants.push(student_id);
            }

            let verdict = candidate.eligibility();
            run.outcome.eligibility_audit.push(EligibilityAudit {
                school_id,
                student_id,
                class_id: candidate.class_id,
                class_listed: candidate.class_listed(),
                eligible: verdict.is_eligible(),
                reason: verdict.reason(),
            });

            if verdict.is_eligible() {
                eligible.push(candidate);
            } else {
                debug!(%student_id, class_id = %candidate.class_id, reason = %verdict.reason(), "preference ineligible");
            }
        }

        if eligible.is_empty() {
            info!(%school_id, "no eligible preferences found for this school");
        }

        rank_candidates(&mut eligible);
        let queues = queues_by_student(eligible);
        let ranked: HashSet<StudentId> = queues.iter().map(|queue| queue.student_id).collect();

        for queue in &queues {
            self.assign_student(school_id, queue, ledger, run)?;
        }

        if self.policy.emit_ineligible_status {
            for student_id in applicants.into_iter().filter(|id| !ranked.contains(id)) {
                run.outcome.status_updates.push(ApplicationStatusUpdate {
                    student_id,
                    school_id,
                    status: ApplicationStatus::Ineligible,
                    class_id: None,
                    assigned_date: None,
                });
                run.outcome.rejections.push(RejectionRecord {
                    student_id,
                    reason: NO_ELIGIBLE_PREFERENCE_REASON.to_string(),
                });
            }
        }

        Ok(())
    }

    fn assign_student(
        &self,
        school_id: SchoolId,
        queue: &StudentQueue<'_>,
        ledger: &mut CapacityLedger,
        run: &mut RunState,
    ) -> Result<(), CapacityError> {
        let student_id = queue.student_id;

        let Some(choice) = queue
            .candidates
            .iter()
            .find(|candidate| ledger.has_seat(candidate.class_id))
        else {
            let top_choice = queue.top_choice().map(|candidate| candidate.class_id);
            info!(%student_id, %school_id, "no capacity in preferred classes; waitlisted");
            run.outcome.status_updates.push(ApplicationStatusUpdate {
                student_id,
                school_id,
                status: ApplicationStatus::Waitlist,
                class_id: top_choice,
                assigned_date: None,
            });
            run.outcome.rejections.push(RejectionRecord {
                student_id,
                reason: NO_CAPACITY_REASON.to_string(),
            });
            return Ok(());
        };

        let class_id = choice.class_id;
        let seats_left = ledger.decrement(class_id)?;
        let enrollment_id = run.next_enrollment_id();
        debug!(%student_id, %class_id, %enrollment_id, seats_left, "student enrolled");

        run.outcome.enrollments.push(Enrollment {
            enrollment_id,
            student_id,
            class_id,
            enrollment_date: run.outcome.run_date,
            status: EnrollmentStatus::Enrolled,
        });
        run.outcome.status_updates.push(ApplicationStatusUpdate {
            student_id,
            school_id,
            status: ApplicationStatus::Approved,
            class_id: Some(class_id),
            assigned_date: Some(run.outcome.run_date),
        });

        Ok(())
    }
}

/// Enrollment ids count in `u64` so any `u32` starting offset has room for
/// every enrollment a run can emit.
struct RunState {
    next_counter: u64,
    outcome: AllocationOutcome,
}

impl RunState {
    fn new(policy: &AllocationPolicy, run_date: NaiveDate) -> Self {
        Self {
            next_counter: u64::from(policy.enrollment_id_start),
            outcome: AllocationOutcome {
                run_date,
                ..AllocationOutcome::default()
            },
        }
    }

    fn next_enrollment_id(&mut self) -> EnrollmentId {
        let id = EnrollmentId::sequential(self.next_counter);
        self.next_counter += 1;
        id
    }
}
