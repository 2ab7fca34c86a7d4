//! Placement drive eligibility and application gating.
//!
//! `eligibility` holds the pure rule engine shared by live client checks and
//! the server-side write gate; the remaining modules host that gate and the
//! admin triage helpers around it.

pub mod domain;
pub mod eligibility;
pub mod records;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationStatus, JobApplication, JobPosting, PostingId, PostingStats,
    PostingStatus, StudentId, StudentRecord,
};
pub use eligibility::{
    evaluate, format_reason, CandidateEducation, EligibilityCriteria, EligibilityResult, RuleId,
    SeniorSecondaryTrack,
};
pub use records::{PostingEligibilityRecord, RecordError, StudentEducationRecord};
pub use repository::{
    ApplicationRepository, ApplicationView, BulkStatusOutcome, EligibilityReport,
    PlacementDirectory, RepositoryError,
};
pub use router::placement_router;
pub use service::{PlacementService, PlacementServiceError};
