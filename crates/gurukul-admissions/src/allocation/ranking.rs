use std::cmp::Ordering;
use std::collections::HashMap;

use super::domain::StudentId;
use super::intake::Candidate;

/// Orders candidates by rank, then submission time, then test score.
///
/// Scores sort high to low with missing scores after every scored candidate.
/// The sort is stable, so full ties keep their input order.
pub fn rank_candidates(candidates: &mut [Candidate<'_>]) {
    candidates.sort_by(compare_candidates);
}

pub fn compare_candidates(left: &Candidate<'_>, right: &Candidate<'_>) -> Ordering {
    left.preference
        .rank
        .cmp(&right.preference.rank)
        .then_with(|| {
            left.preference
                .submission_date
                .cmp(&right.preference.submission_date)
        })
        .then_with(|| compare_scores(left.student.test_score, right.student.test_score))
}

fn compare_scores(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A student's ranked candidates, best first.
#[derive(Debug)]
pub struct StudentQueue<'a> {
    pub student_id: StudentId,
    pub candidates: Vec<Candidate<'a>>,
}

impl<'a> StudentQueue<'a> {
    pub fn top_choice(&self) -> Option<&Candidate<'a>> {
        self.candidates.first()
    }
}

/// Groups ranked candidates by student.
///
/// Students appear in the order of their first ranked candidate and each
/// queue keeps the ranked order.
pub fn queues_by_student<'a>(ranked: Vec<Candidate<'a>>) -> Vec<StudentQueue<'a>> {
    let mut positions: HashMap<StudentId, usize> = HashMap::new();
    let mut queues: Vec<StudentQueue<'a>> = Vec::new();

    for candidate in ranked {
        let student_id = candidate.student.id;
        let position = *positions.entry(student_id).or_insert_with(|| {
            queues.push(StudentQueue {
                student_id,
                candidates: Vec::new(),
            });
            queues.len() - 1
        });
        queues[position].candidates.push(candidate);
    }

    queues
}
