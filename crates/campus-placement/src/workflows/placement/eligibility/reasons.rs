use super::candidate::{CandidateEducation, SeniorSecondaryTrack};
use super::criteria::EligibilityCriteria;
use super::rules::RuleId;

/// Renders the user-facing explanation for a failed rule.
///
/// Wording lives here so rule logic never has to change for copy edits.
pub fn format_reason(
    rule: RuleId,
    criteria: &EligibilityCriteria,
    candidate: &CandidateEducation,
) -> String {
    match rule {
        RuleId::Cgpa => format!("Minimum CGPA required is {}", criteria.min_cgpa),
        RuleId::TenthPercent => format!(
            "Minimum 10th percentage required is {}",
            criteria.min_tenth_percent
        ),
        RuleId::SeniorSecondary(SeniorSecondaryTrack::Twelfth) => format!(
            "Minimum 12th percentage required is {}",
            criteria.min_twelfth_percent
        ),
        RuleId::SeniorSecondary(SeniorSecondaryTrack::Diploma) => format!(
            "Minimum diploma percentage required is {}",
            criteria.min_diploma_percent
        ),
        RuleId::PassingYear => match criteria.passing_year {
            Some(year) => format!("Only {year} batch students are eligible"),
            None => "Passing year does not match the required batch".to_string(),
        },
        RuleId::Backlogs => format!("Max allowed backlogs is {}", criteria.max_backlogs),
        RuleId::Branch => format!(
            "Branch {} is not eligible; allowed branches: {}",
            display_branch(&candidate.branch),
            criteria.allowed_branches.join(", ")
        ),
    }
}

fn display_branch(branch: &str) -> &str {
    let trimmed = branch.trim();
    if trimmed.is_empty() {
        "(not provided)"
    } else {
        trimmed
    }
}
