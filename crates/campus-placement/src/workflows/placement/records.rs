//! Normalization of upstream posting and profile payloads.
//!
//! The backend has shipped several spellings of the same fields over time
//! (`minTwelfth`, `twelfthPercentage`, a `course` string instead of a branch
//! list). These records accept all of them and convert into the canonical
//! eligibility model, rejecting values the evaluator must never see.

use serde::{Deserialize, Serialize};

use super::eligibility::{CandidateEducation, EligibilityCriteria};

/// Raw eligibility criteria as stored alongside a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingEligibilityRecord {
    #[serde(
        rename = "minCGPA",
        alias = "minCgpa",
        alias = "min_cgpa",
        default
    )]
    pub min_cgpa: Option<f64>,
    #[serde(
        rename = "minTenth",
        alias = "minTenthPercent",
        alias = "tenthPercentage",
        alias = "min_tenth_percent",
        default
    )]
    pub min_tenth: Option<f64>,
    #[serde(
        rename = "minTwelfth",
        alias = "minTwelfthPercent",
        alias = "twelfthPercentage",
        alias = "min_twelfth_percent",
        default
    )]
    pub min_twelfth: Option<f64>,
    #[serde(
        rename = "minDiploma",
        alias = "minDiplomaPercent",
        alias = "diplomaPercentage",
        alias = "min_diploma_percent",
        default
    )]
    pub min_diploma: Option<f64>,
    #[serde(rename = "maxBacklogs", alias = "max_backlogs", default)]
    pub max_backlogs: Option<f64>,
    #[serde(rename = "passingYear", alias = "passing_year", default)]
    pub passing_year: Option<f64>,
    #[serde(rename = "allowedBranches", alias = "allowed_branches", default)]
    pub allowed_branches: Option<Vec<String>>,
    /// Legacy comma separated branch list used before `allowedBranches`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
}

/// Raw education section of a student profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentEducationRecord {
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(rename = "tenthPercent", alias = "tenth_percent", default)]
    pub tenth_percent: Option<f64>,
    #[serde(
        rename = "twelfthPercent",
        alias = "twelfthPercentage",
        alias = "twelfth_percent",
        default
    )]
    pub twelfth_percent: Option<f64>,
    #[serde(
        rename = "diplomaPercent",
        alias = "diplomaPercentage",
        alias = "diploma_percent",
        default
    )]
    pub diploma_percent: Option<f64>,
    #[serde(default)]
    pub backlogs: Option<f64>,
    #[serde(rename = "passingYear", alias = "passing_year", default)]
    pub passing_year: Option<f64>,
}

/// Reasons an upstream record cannot be turned into the eligibility model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("{field} must not be negative (found {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be a whole number (found {value})")]
    NotWhole { field: &'static str, value: f64 },
    #[error("{field} is out of range (found {value})")]
    OutOfRange { field: &'static str, value: f64 },
}

impl TryFrom<PostingEligibilityRecord> for EligibilityCriteria {
    type Error = RecordError;

    fn try_from(record: PostingEligibilityRecord) -> Result<Self, Self::Error> {
        let allowed_branches = match (record.allowed_branches, record.course) {
            (Some(branches), _) => clean_branches(branches),
            (None, Some(course)) => clean_branches(course.split(',').map(str::to_string)),
            (None, None) => Vec::new(),
        };

        Ok(Self {
            min_cgpa: threshold("minCGPA", record.min_cgpa)?,
            min_tenth_percent: threshold("minTenth", record.min_tenth)?,
            min_twelfth_percent: threshold("minTwelfth", record.min_twelfth)?,
            min_diploma_percent: threshold("minDiploma", record.min_diploma)?,
            max_backlogs: count("maxBacklogs", record.max_backlogs)?,
            passing_year: year("passingYear", record.passing_year)?,
            allowed_branches,
        })
    }
}

impl TryFrom<StudentEducationRecord> for CandidateEducation {
    type Error = RecordError;

    fn try_from(record: StudentEducationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            branch: record.branch.unwrap_or_default().trim().to_string(),
            cgpa: threshold("cgpa", record.cgpa)?,
            tenth_percent: threshold("tenthPercent", record.tenth_percent)?,
            twelfth_percent: optional_threshold("twelfthPercent", record.twelfth_percent)?,
            diploma_percent: optional_threshold("diplomaPercent", record.diploma_percent)?,
            backlogs: count("backlogs", record.backlogs)?,
            passing_year: year("passingYear", record.passing_year)?.unwrap_or_default(),
        })
    }
}

fn clean_branches<I>(branches: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    branches
        .into_iter()
        .map(|branch| branch.trim().to_string())
        .filter(|branch| !branch.is_empty())
        .collect()
}

fn optional_threshold(field: &'static str, value: Option<f64>) -> Result<Option<f64>, RecordError> {
    match value {
        Some(value) => threshold(field, Some(value)).map(Some),
        None => Ok(None),
    }
}

fn threshold(field: &'static str, value: Option<f64>) -> Result<f64, RecordError> {
    let value = value.unwrap_or_default();
    if !value.is_finite() {
        return Err(RecordError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(RecordError::Negative { field, value });
    }
    Ok(value)
}

fn whole(field: &'static str, value: f64, max: f64) -> Result<f64, RecordError> {
    let value = threshold(field, Some(value))?;
    if value.fract() != 0.0 {
        return Err(RecordError::NotWhole { field, value });
    }
    if value > max {
        return Err(RecordError::OutOfRange { field, value });
    }
    Ok(value)
}

fn count(field: &'static str, value: Option<f64>) -> Result<u32, RecordError> {
    match value {
        Some(value) => whole(field, value, u32::MAX as f64).map(|value| value as u32),
        None => Ok(0),
    }
}

// A stored year of zero is how the admin form persists "no batch restriction".
fn year(field: &'static str, value: Option<f64>) -> Result<Option<u16>, RecordError> {
    match value {
        Some(value) => {
            let value = whole(field, value, u16::MAX as f64)? as u16;
            Ok((value != 0).then_some(value))
        }
        None => Ok(None),
    }
}
