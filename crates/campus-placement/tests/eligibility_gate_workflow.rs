use campus_placement::workflows::placement::{
    evaluate, ApplicationId, ApplicationRepository, ApplicationStatus, CandidateEducation,
    EligibilityCriteria, JobApplication, JobPosting, PlacementDirectory, PlacementService,
    PlacementServiceError, PostingEligibilityRecord, PostingId, PostingStatus, RepositoryError,
    RuleId, SeniorSecondaryTrack, StudentEducationRecord, StudentId, StudentRecord,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn upstream_criteria() -> EligibilityCriteria {
    let record: PostingEligibilityRecord = serde_json::from_value(json!({
        "minCGPA": 7,
        "minTenth": 80,
        "minTwelfth": 75,
        "minDiploma": 60,
        "maxBacklogs": 0,
        "passingYear": 2025,
        "allowedBranches": ["Computer"]
    }))
    .expect("criteria record parses");
    EligibilityCriteria::try_from(record).expect("criteria normalize")
}

fn upstream_candidate(value: serde_json::Value) -> CandidateEducation {
    let record: StudentEducationRecord =
        serde_json::from_value(value).expect("education record parses");
    CandidateEducation::try_from(record).expect("education normalizes")
}

#[derive(Default)]
struct Directory {
    postings: HashMap<PostingId, JobPosting>,
    students: Vec<StudentRecord>,
}

impl PlacementDirectory for Directory {
    fn posting(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(self.postings.get(id).cloned())
    }

    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        Ok(self.students.iter().find(|student| &student.id == id).cloned())
    }

    fn students(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        Ok(self.students.clone())
    }
}

#[derive(Default)]
struct Applications {
    records: Mutex<HashMap<ApplicationId, JobApplication>>,
}

impl ApplicationRepository for Applications {
    fn insert(&self, application: JobApplication) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.posting_id == application.posting_id
                && existing.student_id == application.student_id
        });
        if duplicate || guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: JobApplication) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("mutex poisoned");
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        Ok(self.records.lock().expect("mutex poisoned").get(id).cloned())
    }

    fn for_posting(&self, posting_id: &PostingId) -> Result<Vec<JobApplication>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("mutex poisoned")
            .values()
            .filter(|application| &application.posting_id == posting_id)
            .cloned()
            .collect())
    }

    fn find(
        &self,
        posting_id: &PostingId,
        student_id: &StudentId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("mutex poisoned")
            .values()
            .find(|application| {
                &application.posting_id == posting_id && &application.student_id == student_id
            })
            .cloned())
    }
}

#[test]
fn diploma_candidate_is_judged_on_diploma_threshold() {
    let criteria = upstream_criteria();
    let candidate = upstream_candidate(json!({
        "branch": "Computer Engineering",
        "cgpa": 7.5,
        "tenthPercent": 82,
        "twelfthPercent": null,
        "diplomaPercent": 58,
        "backlogs": 0,
        "passingYear": 2025
    }));

    let result = evaluate(&criteria, &candidate);

    assert!(!result.is_eligible);
    assert_eq!(
        result.reasons,
        vec!["Minimum diploma percentage required is 60"]
    );
    assert_eq!(
        result.failed_rules,
        vec![RuleId::SeniorSecondary(SeniorSecondaryTrack::Diploma)]
    );
}

#[test]
fn every_failing_rule_is_reported_in_order() {
    let criteria = upstream_criteria();
    let candidate = upstream_candidate(json!({
        "branch": "Civil",
        "cgpa": 5.9,
        "tenthPercent": 70,
        "twelfthPercent": 60,
        "backlogs": 3,
        "passingYear": 2024
    }));

    let result = evaluate(&criteria, &candidate);

    assert_eq!(
        result.reasons,
        vec![
            "Minimum CGPA required is 7",
            "Minimum 10th percentage required is 80",
            "Minimum 12th percentage required is 75",
            "Only 2025 batch students are eligible",
            "Max allowed backlogs is 0",
            "Branch Civil is not eligible; allowed branches: Computer",
        ]
    );
    assert_eq!(result.reasons.len(), result.failed_rules.len());
}

#[test]
fn write_gate_admits_once_and_tracks_triage() {
    let posting = JobPosting {
        id: PostingId("drive-1".to_string()),
        company: "Acme".to_string(),
        role: "SDE".to_string(),
        ctc_lpa: 9.0,
        deadline: now() + Duration::days(3),
        status: PostingStatus::Open,
        eligibility: upstream_criteria(),
    };
    let student = StudentRecord {
        id: StudentId("stu-1".to_string()),
        name: "Asha Patil".to_string(),
        education: Some(upstream_candidate(json!({
            "branch": "Computer Engineering",
            "cgpa": 8.2,
            "tenthPercent": 88,
            "twelfthPercentage": 81,
            "backlogs": 0,
            "passingYear": 2025
        }))),
    };
    let mut directory = Directory::default();
    directory.postings.insert(posting.id.clone(), posting.clone());
    directory.students.push(student.clone());
    let service = PlacementService::new(Arc::new(directory), Arc::new(Applications::default()));

    let application = service
        .apply(&posting.id, &student.id, now())
        .expect("eligible student applies");
    assert!(matches!(
        service.apply(&posting.id, &student.id, now()),
        Err(PlacementServiceError::AlreadyApplied { .. })
    ));

    service
        .update_statuses(&[application.id.clone()], ApplicationStatus::Selected)
        .expect("selection succeeds");
    let outcome = service
        .update_statuses(&[application.id.clone()], ApplicationStatus::Rejected)
        .expect("bulk update runs");
    assert_eq!(outcome.skipped, vec![application.id]);

    let stats = service.stats(&posting.id).expect("stats load");
    assert_eq!(stats.eligible, 1);
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.selected, 1);
    assert_eq!(stats.rejected, 0);
}

#[test]
fn late_application_is_refused_even_for_eligible_student() {
    let posting = JobPosting {
        id: PostingId("drive-late".to_string()),
        company: "Acme".to_string(),
        role: "SDE".to_string(),
        ctc_lpa: 9.0,
        deadline: now() - Duration::hours(1),
        status: PostingStatus::Open,
        eligibility: EligibilityCriteria::default(),
    };
    let student = StudentRecord {
        id: StudentId("stu-1".to_string()),
        name: "Asha Patil".to_string(),
        education: Some(CandidateEducation::default()),
    };
    let mut directory = Directory::default();
    directory.postings.insert(posting.id.clone(), posting.clone());
    directory.students.push(student.clone());
    let service = PlacementService::new(Arc::new(directory), Arc::new(Applications::default()));

    let report = service
        .check(&posting.id, &student.id)
        .expect("check still answers");
    assert!(report.result.is_eligible);
    assert!(matches!(
        service.apply(&posting.id, &student.id, now()),
        Err(PlacementServiceError::DeadlinePassed { .. })
    ));
}
