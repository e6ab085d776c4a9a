use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::allocation::domain::{
    tag_set, Application, Class, ClassId, Preference, SchoolId, Student, StudentId,
};
use crate::allocation::intake::AdmissionsDataset;

pub(super) fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid run date")
}

pub(super) fn submitted(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .expect("valid submission date")
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
}

pub(super) fn student(id: u32, age: u32) -> Student {
    Student {
        id: StudentId(id),
        age: Some(age),
        fee_paid: true,
        test_score: Some(80.0),
        completed_courses: BTreeSet::new(),
        student_type: "day".to_string(),
    }
}

pub(super) fn class(id: u32, capacity: u32) -> Class {
    Class {
        id: ClassId(id),
        capacity,
        min_age: None,
        max_age: None,
        fee_required: false,
        min_score: None,
        prerequisites: BTreeSet::new(),
        student_type_restrictions: None,
    }
}

pub(super) fn restricted_class(id: u32, allowed: &str) -> Class {
    Class {
        student_type_restrictions: Some(tag_set(allowed)),
        ..class(id, 1)
    }
}

pub(super) fn preference(student: u32, class: u32, rank: u32, day: u32) -> Preference {
    Preference {
        student_id: StudentId(student),
        class_id: ClassId(class),
        rank,
        submission_date: submitted(day),
    }
}

pub(super) fn application(student: u32, school: u32) -> Application {
    Application {
        student_id: StudentId(student),
        school_id: SchoolId(school),
    }
}

/// Class C1 (capacity 1, ages 5-10) with students A (1) and B (2), both age 7
/// and ranking C1 first, A submitting a day earlier than B.
pub(super) fn single_seat_dataset() -> AdmissionsDataset {
    AdmissionsDataset {
        students: vec![student(1, 7), student(2, 7)],
        classes: vec![Class {
            min_age: Some(5),
            max_age: Some(10),
            ..class(1, 1)
        }],
        preferences: vec![preference(2, 1, 1, 2), preference(1, 1, 1, 1)],
        applications: vec![application(1, 1), application(2, 1)],
    }
}
