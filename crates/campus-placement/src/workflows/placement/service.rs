use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    ApplicationId, ApplicationStatus, JobApplication, JobPosting, PostingId, PostingStats,
    PostingStatus, StudentId, StudentRecord,
};
use super::eligibility::{evaluate, CandidateEducation};
use super::repository::{
    ApplicationRepository, BulkStatusOutcome, EligibilityReport, PlacementDirectory,
    RepositoryError,
};

/// Service composing the placement directory, application store, and eligibility rules.
///
/// Every decision re-reads postings and profiles from the directory, so a
/// result computed by a client is never trusted at write time.
pub struct PlacementService<D, R> {
    directory: Arc<D>,
    applications: Arc<R>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("appl-{id:06}"))
}

impl<D, R> PlacementService<D, R>
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    pub fn new(directory: Arc<D>, applications: Arc<R>) -> Self {
        Self {
            directory,
            applications,
        }
    }

    /// Evaluate a student against a posting using freshly loaded records.
    pub fn check(
        &self,
        posting_id: &PostingId,
        student_id: &StudentId,
    ) -> Result<EligibilityReport, PlacementServiceError> {
        let posting = self.load_posting(posting_id)?;
        let student = self.load_student(student_id)?;
        let education = education_of(&student)?;

        Ok(EligibilityReport {
            posting_id: posting.id.clone(),
            student_id: student.id.clone(),
            result: evaluate(&posting.eligibility, education),
        })
    }

    /// Authoritative write gate for a new application.
    pub fn apply(
        &self,
        posting_id: &PostingId,
        student_id: &StudentId,
        now: DateTime<Utc>,
    ) -> Result<JobApplication, PlacementServiceError> {
        let posting = self.load_posting(posting_id)?;
        if posting.status != PostingStatus::Open {
            return Err(PlacementServiceError::PostingClosed {
                posting_id: posting.id,
                status: posting.status,
            });
        }
        if !posting.accepts_applications_at(now) {
            return Err(PlacementServiceError::DeadlinePassed {
                posting_id: posting.id,
                deadline: posting.deadline,
            });
        }

        let student = self.load_student(student_id)?;
        let education = education_of(&student)?;

        if let Some(existing) = self.applications.find(&posting.id, &student.id)? {
            return Err(PlacementServiceError::AlreadyApplied {
                application_id: existing.id,
            });
        }

        let result = evaluate(&posting.eligibility, education);
        if !result.is_eligible {
            warn!(
                posting = %posting.id,
                student = %student.id,
                failed = result.failed_rules.len(),
                "application rejected by eligibility gate"
            );
            return Err(PlacementServiceError::Ineligible {
                reasons: result.reasons,
            });
        }

        let application = JobApplication {
            id: next_application_id(),
            posting_id: posting.id,
            student_id: student.id,
            status: ApplicationStatus::Applied,
            applied_at: now,
        };
        let attempted = application.id.clone();
        let stored = match self.applications.insert(application) {
            Ok(stored) => stored,
            // A concurrent apply for the same pair won between `find` and `insert`.
            Err(RepositoryError::Conflict) => {
                let application_id = self
                    .applications
                    .find(posting_id, student_id)?
                    .map(|existing| existing.id)
                    .unwrap_or(attempted);
                return Err(PlacementServiceError::AlreadyApplied { application_id });
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            application = %stored.id,
            posting = %stored.posting_id,
            student = %stored.student_id,
            "application accepted"
        );
        Ok(stored)
    }

    /// Students with a completed education record who clear the posting's criteria.
    pub fn eligible_students(
        &self,
        posting_id: &PostingId,
    ) -> Result<Vec<StudentRecord>, PlacementServiceError> {
        let posting = self.load_posting(posting_id)?;
        Ok(self.eligible_for(&posting)?)
    }

    pub fn applications(
        &self,
        posting_id: &PostingId,
    ) -> Result<Vec<JobApplication>, PlacementServiceError> {
        let posting = self.load_posting(posting_id)?;
        let mut applications = self.applications.for_posting(&posting.id)?;
        applications.sort_by(|a, b| a.applied_at.cmp(&b.applied_at).then(a.id.cmp(&b.id)));
        Ok(applications)
    }

    pub fn stats(&self, posting_id: &PostingId) -> Result<PostingStats, PlacementServiceError> {
        let posting = self.load_posting(posting_id)?;
        let eligible = self.eligible_for(&posting)?.len();
        let applications = self.applications.for_posting(&posting.id)?;

        let mut stats = PostingStats {
            eligible,
            applied: applications.len(),
            ..PostingStats::default()
        };
        for application in &applications {
            match application.status {
                ApplicationStatus::Shortlisted => stats.shortlisted += 1,
                ApplicationStatus::Selected => stats.selected += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
                ApplicationStatus::Applied => {}
            }
        }

        Ok(stats)
    }

    /// Move a batch of applications to a triage status.
    ///
    /// Unknown ids and applications already selected are reported as skipped.
    pub fn update_statuses(
        &self,
        application_ids: &[ApplicationId],
        status: ApplicationStatus,
    ) -> Result<BulkStatusOutcome, PlacementServiceError> {
        if status == ApplicationStatus::Applied {
            return Err(PlacementServiceError::InvalidStatus(status));
        }

        let mut outcome = BulkStatusOutcome {
            status,
            updated: Vec::new(),
            skipped: Vec::new(),
        };

        for id in application_ids {
            match self.applications.fetch(id)? {
                Some(application) if !application.status.is_final() => {
                    let application = JobApplication {
                        status,
                        ..application
                    };
                    self.applications.update(application)?;
                    outcome.updated.push(id.clone());
                }
                _ => outcome.skipped.push(id.clone()),
            }
        }

        info!(
            status = status.label(),
            updated = outcome.updated.len(),
            skipped = outcome.skipped.len(),
            "bulk application status update"
        );
        Ok(outcome)
    }

    fn eligible_for(&self, posting: &JobPosting) -> Result<Vec<StudentRecord>, RepositoryError> {
        Ok(self
            .directory
            .students()?
            .into_iter()
            .filter(|student| {
                student
                    .education
                    .as_ref()
                    .map(|education| evaluate(&posting.eligibility, education).is_eligible)
                    .unwrap_or(false)
            })
            .collect())
    }

    fn load_posting(&self, id: &PostingId) -> Result<JobPosting, PlacementServiceError> {
        self.directory
            .posting(id)?
            .ok_or_else(|| PlacementServiceError::PostingNotFound(id.clone()))
    }

    fn load_student(&self, id: &StudentId) -> Result<StudentRecord, PlacementServiceError> {
        self.directory
            .student(id)?
            .ok_or_else(|| PlacementServiceError::StudentNotFound(id.clone()))
    }
}

fn education_of(student: &StudentRecord) -> Result<&CandidateEducation, PlacementServiceError> {
    student
        .education
        .as_ref()
        .ok_or_else(|| PlacementServiceError::MissingEducation(student.id.clone()))
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("posting {0} not found")]
    PostingNotFound(PostingId),
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("student {0} has no education details on record")]
    MissingEducation(StudentId),
    #[error("posting {posting_id} is {} and not accepting applications", .status.label())]
    PostingClosed {
        posting_id: PostingId,
        status: PostingStatus,
    },
    #[error("application deadline for posting {posting_id} passed at {deadline}")]
    DeadlinePassed {
        posting_id: PostingId,
        deadline: DateTime<Utc>,
    },
    #[error("student already applied ({application_id})")]
    AlreadyApplied { application_id: ApplicationId },
    #[error("student is not eligible: {}", .reasons.join("; "))]
    Ineligible { reasons: Vec<String> },
    #[error("{} is not a valid triage status", .0.label())]
    InvalidStatus(ApplicationStatus),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PlacementServiceError {
    /// Stable machine-readable kind for API payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            PlacementServiceError::PostingNotFound(_) => "POSTING_NOT_FOUND",
            PlacementServiceError::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            PlacementServiceError::MissingEducation(_) => "MISSING_EDUCATION",
            PlacementServiceError::PostingClosed { .. } => "POSTING_CLOSED",
            PlacementServiceError::DeadlinePassed { .. } => "DEADLINE_PASSED",
            PlacementServiceError::AlreadyApplied { .. } => "ALREADY_APPLIED",
            PlacementServiceError::Ineligible { .. } => "INELIGIBLE",
            PlacementServiceError::InvalidStatus(_) => "INVALID_STATUS",
            PlacementServiceError::Repository(_) => "REPOSITORY_UNAVAILABLE",
        }
    }
}
