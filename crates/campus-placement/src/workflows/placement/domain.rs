use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::eligibility::{CandidateEducation, EligibilityCriteria};

/// Identifier wrapper for job postings (drives).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostingId(pub String);

/// Identifier wrapper for students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publication state of a posting; only open postings take applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingStatus {
    Draft,
    Open,
    Closed,
    Archived,
}

impl PostingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PostingStatus::Draft => "DRAFT",
            PostingStatus::Open => "OPEN",
            PostingStatus::Closed => "CLOSED",
            PostingStatus::Archived => "ARCHIVED",
        }
    }
}

/// Job or internship opening published by the placement cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: PostingId,
    pub company: String,
    pub role: String,
    /// Annual package in lakhs per annum.
    pub ctc_lpa: f64,
    pub deadline: DateTime<Utc>,
    pub status: PostingStatus,
    pub eligibility: EligibilityCriteria,
}

impl JobPosting {
    pub fn accepts_applications_at(&self, now: DateTime<Utc>) -> bool {
        self.status == PostingStatus::Open && now <= self.deadline
    }
}

/// Student as seen by the placement workflow. `education` is `None` until
/// the student fills the education section of their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub education: Option<CandidateEducation>,
}

/// Triage state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::Selected => "SELECTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    /// Selected offers are locked against further triage.
    pub const fn is_final(self) -> bool {
        matches!(self, ApplicationStatus::Selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub posting_id: PostingId,
    pub student_id: StudentId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// Headline counts shown on the admin job page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostingStats {
    pub eligible: usize,
    pub applied: usize,
    pub shortlisted: usize,
    pub selected: usize,
    pub rejected: usize,
}
