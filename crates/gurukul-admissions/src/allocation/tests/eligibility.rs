use super::common::*;
use crate::allocation::domain::{tag_set, Class};
use crate::allocation::eligibility::{evaluate, Eligibility, IneligibilityReason};

#[test]
fn unconstrained_class_admits_anyone() {
    let verdict = evaluate(&student(1, 3), &class(1, 10));
    assert_eq!(verdict, Eligibility::Eligible);
    assert_eq!(verdict.reason(), "Eligible");
}

#[test]
fn age_bounds_are_inclusive() {
    let bounded = Class {
        min_age: Some(5),
        max_age: Some(10),
        ..class(1, 1)
    };

    assert!(evaluate(&student(1, 5), &bounded).is_eligible());
    assert!(evaluate(&student(1, 10), &bounded).is_eligible());

    let young = evaluate(&student(1, 4), &bounded);
    assert_eq!(young.reason(), "Age below minimum");
    assert_eq!(
        young,
        Eligibility::Ineligible(IneligibilityReason::AgeBelowMinimum { age: 4, min_age: 5 })
    );

    let old = evaluate(&student(1, 12), &bounded);
    assert_eq!(old.reason(), "Age above maximum");
}

#[test]
fn unrecorded_age_is_not_held_to_age_bounds() {
    let bounded = Class {
        min_age: Some(5),
        max_age: Some(10),
        fee_required: true,
        ..class(1, 1)
    };
    let mut applicant = student(1, 7);
    applicant.age = None;

    assert!(evaluate(&applicant, &bounded).is_eligible());
    applicant.fee_paid = false;
    assert_eq!(evaluate(&applicant, &bounded).reason(), "Fee not paid");
}

#[test]
fn unpaid_fee_blocks_fee_required_class() {
    let paid_class = Class {
        fee_required: true,
        ..class(1, 1)
    };
    let mut applicant = student(1, 8);
    applicant.fee_paid = false;

    assert_eq!(evaluate(&applicant, &paid_class).reason(), "Fee not paid");
    assert!(evaluate(&applicant, &class(2, 1)).is_eligible());
}

#[test]
fn missing_score_never_disqualifies() {
    let scored_class = Class {
        min_score: Some(90.0),
        ..class(1, 1)
    };
    let mut applicant = student(1, 8);
    applicant.test_score = None;
    assert!(evaluate(&applicant, &scored_class).is_eligible());

    applicant.test_score = Some(89.5);
    assert_eq!(
        evaluate(&applicant, &scored_class).reason(),
        "Test score below minimum"
    );

    applicant.test_score = Some(90.0);
    assert!(evaluate(&applicant, &scored_class).is_eligible());
}

#[test]
fn prerequisites_must_be_a_subset_of_completed_courses() {
    let advanced = Class {
        prerequisites: tag_set("MATH101, SCI100"),
        ..class(1, 1)
    };
    let mut applicant = student(1, 9);
    applicant.completed_courses = tag_set("MATH101");

    match evaluate(&applicant, &advanced) {
        Eligibility::Ineligible(IneligibilityReason::MissingPrerequisites { missing }) => {
            assert_eq!(missing, vec!["SCI100".to_string()]);
        }
        other => panic!("expected missing prerequisite, got {other:?}"),
    }
    assert_eq!(
        evaluate(&applicant, &advanced).reason(),
        "Missing prerequisite(s)"
    );

    applicant.completed_courses = tag_set("SCI100,MATH101,ART1");
    assert!(evaluate(&applicant, &advanced).is_eligible());
}

#[test]
fn student_type_restrictions_quote_the_rejected_type() {
    let boarding_only = restricted_class(1, "boarding, weekly");
    let applicant = student(1, 8);

    assert_eq!(
        evaluate(&applicant, &boarding_only).reason(),
        "Type 'day' not allowed"
    );
    assert!(evaluate(&applicant, &restricted_class(2, "day,boarding")).is_eligible());
}

#[test]
fn rules_short_circuit_in_declared_order() {
    let strict = Class {
        min_age: Some(10),
        fee_required: true,
        min_score: Some(95.0),
        prerequisites: tag_set("LATIN"),
        student_type_restrictions: Some(tag_set("boarding")),
        ..class(1, 1)
    };
    let mut applicant = student(1, 6);
    applicant.fee_paid = false;
    applicant.test_score = Some(10.0);

    assert_eq!(evaluate(&applicant, &strict).reason(), "Age below minimum");
    applicant.age = Some(11);
    assert_eq!(evaluate(&applicant, &strict).reason(), "Fee not paid");
    applicant.fee_paid = true;
    assert_eq!(
        evaluate(&applicant, &strict).reason(),
        "Test score below minimum"
    );
    applicant.test_score = None;
    assert_eq!(
        evaluate(&applicant, &strict).reason(),
        "Missing prerequisite(s)"
    );
    applicant.completed_courses = tag_set("LATIN");
    assert_eq!(
        evaluate(&applicant, &strict).reason(),
        "Type 'day' not allowed"
    );
}
