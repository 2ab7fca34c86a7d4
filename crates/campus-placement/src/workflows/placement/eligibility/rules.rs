use super::candidate::{CandidateEducation, SeniorSecondaryTrack};
use super::criteria::EligibilityCriteria;
use serde::{Deserialize, Serialize};

/// Identifies one eligibility check. Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Cgpa,
    TenthPercent,
    SeniorSecondary(SeniorSecondaryTrack),
    PassingYear,
    Backlogs,
    Branch,
}

/// Runs every check in order and returns the ids of those that failed.
pub(crate) fn failed_rules(
    criteria: &EligibilityCriteria,
    candidate: &CandidateEducation,
) -> Vec<RuleId> {
    let mut failed = Vec::new();

    if candidate.cgpa < criteria.min_cgpa {
        failed.push(RuleId::Cgpa);
    }

    if candidate.tenth_percent < criteria.min_tenth_percent {
        failed.push(RuleId::TenthPercent);
    }

    let track = candidate.senior_secondary_track();
    let required = match track {
        SeniorSecondaryTrack::Twelfth => criteria.min_twelfth_percent,
        SeniorSecondaryTrack::Diploma => criteria.min_diploma_percent,
    };
    if candidate.senior_secondary_percent() < required {
        failed.push(RuleId::SeniorSecondary(track));
    }

    if let Some(year) = criteria.passing_year {
        if candidate.passing_year != year {
            failed.push(RuleId::PassingYear);
        }
    }

    if candidate.backlogs > criteria.max_backlogs {
        failed.push(RuleId::Backlogs);
    }

    if !criteria.admits_branch(&candidate.branch) {
        failed.push(RuleId::Branch);
    }

    failed
}
