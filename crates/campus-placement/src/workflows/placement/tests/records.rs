use serde_json::json;

use crate::workflows::placement::eligibility::{CandidateEducation, EligibilityCriteria};
use crate::workflows::placement::records::{
    PostingEligibilityRecord, RecordError, StudentEducationRecord,
};

fn criteria_from(value: serde_json::Value) -> Result<EligibilityCriteria, RecordError> {
    let record: PostingEligibilityRecord = serde_json::from_value(value).expect("record parses");
    EligibilityCriteria::try_from(record)
}

fn candidate_from(value: serde_json::Value) -> Result<CandidateEducation, RecordError> {
    let record: StudentEducationRecord = serde_json::from_value(value).expect("record parses");
    CandidateEducation::try_from(record)
}

#[test]
fn admin_criteria_payload_normalizes() {
    let criteria = criteria_from(json!({
        "id": "crit-1",
        "jobPostId": "drive-1",
        "minCGPA": 7,
        "minTenth": 80,
        "minTwelfth": 75,
        "minDiploma": 60,
        "maxBacklogs": 0,
        "passingYear": 2025,
        "allowedBranches": ["Computer", " IT "]
    }))
    .expect("criteria normalize");

    assert_eq!(criteria.min_cgpa, 7.0);
    assert_eq!(criteria.min_tenth_percent, 80.0);
    assert_eq!(criteria.min_twelfth_percent, 75.0);
    assert_eq!(criteria.min_diploma_percent, 60.0);
    assert_eq!(criteria.max_backlogs, 0);
    assert_eq!(criteria.passing_year, Some(2025));
    assert_eq!(criteria.allowed_branches, vec!["Computer", "IT"]);
}

#[test]
fn legacy_field_names_are_accepted() {
    let criteria = criteria_from(json!({
        "minCgpa": 6.5,
        "tenthPercentage": 70,
        "twelfthPercentage": 65,
        "diplomaPercentage": 55,
        "course": "Computer, E&TC,,IT"
    }))
    .expect("criteria normalize");

    assert_eq!(criteria.min_cgpa, 6.5);
    assert_eq!(criteria.min_tenth_percent, 70.0);
    assert_eq!(criteria.min_twelfth_percent, 65.0);
    assert_eq!(criteria.min_diploma_percent, 55.0);
    assert_eq!(criteria.allowed_branches, vec!["Computer", "E&TC", "IT"]);
}

#[test]
fn branch_list_takes_precedence_over_course_string() {
    let criteria = criteria_from(json!({
        "allowedBranches": ["All"],
        "course": "Computer"
    }))
    .expect("criteria normalize");

    assert_eq!(criteria.allowed_branches, vec!["All"]);
}

#[test]
fn missing_thresholds_default_to_zero_and_zero_year_is_absent() {
    let criteria = criteria_from(json!({ "passingYear": 0 })).expect("criteria normalize");

    assert_eq!(criteria, EligibilityCriteria::default());
}

#[test]
fn negative_thresholds_are_rejected() {
    let error = criteria_from(json!({ "maxBacklogs": -1 })).expect_err("negative rejected");

    assert_eq!(
        error,
        RecordError::Negative {
            field: "maxBacklogs",
            value: -1.0
        }
    );
}

#[test]
fn fractional_backlogs_are_rejected() {
    let error = criteria_from(json!({ "maxBacklogs": 1.5 })).expect_err("fraction rejected");

    assert!(matches!(
        error,
        RecordError::NotWhole {
            field: "maxBacklogs",
            ..
        }
    ));
}

#[test]
fn student_education_payload_normalizes() {
    let candidate = candidate_from(json!({
        "branch": " Computer Engineering ",
        "enrollmentYear": 2021,
        "passingYear": 2025,
        "cgpa": 8.2,
        "tenthPercent": 88,
        "tenthYear": 2019,
        "twelfthPercent": 81,
        "twelfthYear": 2021,
        "diplomaPercent": 0,
        "diplomaYear": 0,
        "backlogs": 0
    }))
    .expect("candidate normalizes");

    assert_eq!(candidate.branch, "Computer Engineering");
    assert_eq!(candidate.twelfth_percent, Some(81.0));
    assert_eq!(candidate.diploma_percent, Some(0.0));
    assert_eq!(candidate.passing_year, 2025);
}

#[test]
fn null_twelfth_leaves_track_absent() {
    let candidate = candidate_from(json!({
        "branch": "Mechanical",
        "cgpa": 7.1,
        "tenthPercent": 76,
        "twelfthPercent": null,
        "diplomaPercent": 72,
        "backlogs": 1,
        "passingYear": 2025
    }))
    .expect("candidate normalizes");

    assert_eq!(candidate.twelfth_percent, None);
    assert_eq!(candidate.diploma_percent, Some(72.0));
}

#[test]
fn empty_education_payload_falls_back_to_zero() {
    let candidate = candidate_from(json!({})).expect("candidate normalizes");

    assert_eq!(candidate, CandidateEducation::default());
}

#[test]
fn negative_candidate_values_are_rejected() {
    let error = candidate_from(json!({ "cgpa": -2 })).expect_err("negative rejected");

    assert!(matches!(error, RecordError::Negative { field: "cgpa", .. }));
}
