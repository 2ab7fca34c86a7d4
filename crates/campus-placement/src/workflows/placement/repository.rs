use serde::Serialize;

use super::domain::{
    ApplicationId, ApplicationStatus, JobApplication, JobPosting, PostingId, StudentId,
    StudentRecord,
};
use super::eligibility::EligibilityResult;

/// Read side of the placement backend: postings and student profiles.
pub trait PlacementDirectory: Send + Sync {
    fn posting(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError>;
    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError>;
    fn students(&self) -> Result<Vec<StudentRecord>, RepositoryError>;
}

/// Storage abstraction for applications so the service can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    /// Must fail with `RepositoryError::Conflict` when the id or the
    /// (posting, student) pair is already stored; the check and the write are
    /// one atomic step.
    fn insert(&self, application: JobApplication) -> Result<JobApplication, RepositoryError>;
    fn update(&self, application: JobApplication) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError>;
    fn for_posting(&self, posting_id: &PostingId) -> Result<Vec<JobApplication>, RepositoryError>;
    fn find(
        &self,
        posting_id: &PostingId,
        student_id: &StudentId,
    ) -> Result<Option<JobApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Eligibility of one student for one posting, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityReport {
    pub posting_id: PostingId,
    pub student_id: StudentId,
    #[serde(flatten)]
    pub result: EligibilityResult,
}

/// Sanitized representation of an application for admin listings.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: ApplicationId,
    pub posting_id: PostingId,
    pub student_id: StudentId,
    pub status: &'static str,
    pub applied_at: String,
}

impl From<&JobApplication> for ApplicationView {
    fn from(application: &JobApplication) -> Self {
        Self {
            application_id: application.id.clone(),
            posting_id: application.posting_id.clone(),
            student_id: application.student_id.clone(),
            status: application.status.label(),
            applied_at: application.applied_at.to_rfc3339(),
        }
    }
}

/// Result of a bulk triage request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkStatusOutcome {
    pub status: ApplicationStatus,
    pub updated: Vec<ApplicationId>,
    pub skipped: Vec<ApplicationId>,
}
