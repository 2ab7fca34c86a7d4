use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::placement::domain::{
    ApplicationId, JobApplication, JobPosting, PostingId, PostingStatus, StudentId, StudentRecord,
};
use crate::workflows::placement::eligibility::{CandidateEducation, EligibilityCriteria};
use crate::workflows::placement::repository::{
    ApplicationRepository, PlacementDirectory, RepositoryError,
};
use crate::workflows::placement::{placement_router, PlacementService};

pub(super) fn criteria() -> EligibilityCriteria {
    EligibilityCriteria {
        min_cgpa: 7.0,
        min_tenth_percent: 80.0,
        min_twelfth_percent: 75.0,
        min_diploma_percent: 60.0,
        max_backlogs: 0,
        passing_year: Some(2025),
        allowed_branches: vec!["Computer".to_string()],
    }
}

pub(super) fn candidate() -> CandidateEducation {
    CandidateEducation {
        branch: "Computer Engineering".to_string(),
        cgpa: 8.2,
        tenth_percent: 88.0,
        twelfth_percent: Some(81.0),
        diploma_percent: None,
        backlogs: 0,
        passing_year: 2025,
    }
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn posting(id: &str, status: PostingStatus) -> JobPosting {
    JobPosting {
        id: PostingId(id.to_string()),
        company: "Acme Systems".to_string(),
        role: "Graduate Engineer".to_string(),
        ctc_lpa: 8.5,
        deadline: Utc
            .with_ymd_and_hms(2099, 12, 31, 23, 59, 0)
            .single()
            .expect("valid deadline"),
        status,
        eligibility: criteria(),
    }
}

pub(super) fn student(id: &str, education: Option<CandidateEducation>) -> StudentRecord {
    StudentRecord {
        id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        education,
    }
}

/// Directory with one open posting, one closed posting, and a small cohort:
/// `stu-eligible` passes every rule, `stu-low-cgpa` fails CGPA and backlogs,
/// `stu-no-education` has not filled education, `stu-mech` is in another branch.
pub(super) fn directory() -> MemoryDirectory {
    let directory = MemoryDirectory::default();
    directory.add_posting(posting("drive-open", PostingStatus::Open));
    directory.add_posting(posting("drive-closed", PostingStatus::Closed));

    directory.add_student(student("stu-eligible", Some(candidate())));

    let mut weak = candidate();
    weak.cgpa = 6.5;
    weak.backlogs = 2;
    directory.add_student(student("stu-low-cgpa", Some(weak)));

    directory.add_student(student("stu-no-education", None));

    let mut mechanical = candidate();
    mechanical.branch = "Mechanical".to_string();
    directory.add_student(student("stu-mech", Some(mechanical)));

    directory
}

pub(super) fn build_service() -> (
    PlacementService<MemoryDirectory, MemoryRepository>,
    Arc<MemoryDirectory>,
    Arc<MemoryRepository>,
) {
    let directory = Arc::new(directory());
    let repository = Arc::new(MemoryRepository::default());
    let service = PlacementService::new(directory.clone(), repository.clone());
    (service, directory, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    postings: Arc<Mutex<HashMap<PostingId, JobPosting>>>,
    students: Arc<Mutex<Vec<StudentRecord>>>,
}

impl MemoryDirectory {
    pub(super) fn add_posting(&self, posting: JobPosting) {
        self.postings
            .lock()
            .expect("directory mutex poisoned")
            .insert(posting.id.clone(), posting);
    }

    pub(super) fn add_student(&self, student: StudentRecord) {
        let mut guard = self.students.lock().expect("directory mutex poisoned");
        guard.retain(|existing| existing.id != student.id);
        guard.push(student);
    }
}

impl PlacementDirectory for MemoryDirectory {
    fn posting(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.postings.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.students.lock().expect("directory mutex poisoned");
        Ok(guard.iter().find(|student| &student.id == id).cloned())
    }

    fn students(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        Ok(self.students.lock().expect("directory mutex poisoned").clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, JobApplication>>>,
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: JobApplication) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_posting(&self, posting_id: &PostingId) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
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
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|application| {
                &application.posting_id == posting_id && &application.student_id == student_id
            })
            .cloned())
    }
}

/// Repository whose next `stale_finds` lookups miss, as a reader racing a
/// concurrent insert would.
#[derive(Default)]
pub(super) struct StaleFindRepository {
    pub(super) inner: MemoryRepository,
    pub(super) stale_finds: AtomicUsize,
}

impl ApplicationRepository for StaleFindRepository {
    fn insert(&self, application: JobApplication) -> Result<JobApplication, RepositoryError> {
        self.inner.insert(application)
    }

    fn update(&self, application: JobApplication) -> Result<(), RepositoryError> {
        self.inner.update(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn for_posting(&self, posting_id: &PostingId) -> Result<Vec<JobApplication>, RepositoryError> {
        self.inner.for_posting(posting_id)
    }

    fn find(
        &self,
        posting_id: &PostingId,
        student_id: &StudentId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        let stale = self
            .stale_finds
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(None);
        }
        self.inner.find(posting_id, student_id)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: JobApplication) -> Result<JobApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: JobApplication) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_posting(&self, _posting_id: &PostingId) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(
        &self,
        _posting_id: &PostingId,
        _student_id: &StudentId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn placement_router_with_service(
    service: PlacementService<MemoryDirectory, MemoryRepository>,
) -> axum::Router {
    placement_router(Arc::new(service))
}
