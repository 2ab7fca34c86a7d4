use serde::{Deserialize, Serialize};

/// Education fields of a student profile that eligibility rules read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateEducation {
    pub branch: String,
    pub cgpa: f64,
    pub tenth_percent: f64,
    pub twelfth_percent: Option<f64>,
    pub diploma_percent: Option<f64>,
    pub backlogs: u32,
    pub passing_year: u16,
}

/// Which senior-secondary record the candidate is judged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorSecondaryTrack {
    Twelfth,
    Diploma,
}

impl SeniorSecondaryTrack {
    pub const fn label(self) -> &'static str {
        match self {
            SeniorSecondaryTrack::Twelfth => "12th",
            SeniorSecondaryTrack::Diploma => "diploma",
        }
    }
}

impl CandidateEducation {
    /// Twelfth wins whenever it is present; diploma is the fallback track.
    pub fn senior_secondary_track(&self) -> SeniorSecondaryTrack {
        if self.twelfth_percent.is_some() {
            SeniorSecondaryTrack::Twelfth
        } else {
            SeniorSecondaryTrack::Diploma
        }
    }

    /// Percentage on the selected track; absent counts as zero.
    pub fn senior_secondary_percent(&self) -> f64 {
        match self.senior_secondary_track() {
            SeniorSecondaryTrack::Twelfth => self.twelfth_percent.unwrap_or_default(),
            SeniorSecondaryTrack::Diploma => self.diploma_percent.unwrap_or_default(),
        }
    }
}
