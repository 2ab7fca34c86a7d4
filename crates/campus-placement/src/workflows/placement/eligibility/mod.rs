mod candidate;
mod criteria;
mod reasons;
mod rules;

pub use candidate::{CandidateEducation, SeniorSecondaryTrack};
pub use criteria::EligibilityCriteria;
pub use reasons::format_reason;
pub use rules::RuleId;

use serde::{Deserialize, Serialize};

/// Outcome of checking one candidate against one posting.
///
/// `reasons` and `failed_rules` are parallel and follow rule order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub is_eligible: bool,
    pub reasons: Vec<String>,
    pub failed_rules: Vec<RuleId>,
}

impl EligibilityResult {
    pub fn summary(&self) -> String {
        if self.is_eligible {
            "eligible".to_string()
        } else {
            format!("not eligible: {}", self.reasons.join("; "))
        }
    }
}

/// Stateless evaluation of a candidate's education record against posting criteria.
///
/// Every check runs; a failure appends one reason and never stops the rest.
pub fn evaluate(criteria: &EligibilityCriteria, candidate: &CandidateEducation) -> EligibilityResult {
    let failed_rules = rules::failed_rules(criteria, candidate);
    let reasons = failed_rules
        .iter()
        .map(|rule| format_reason(*rule, criteria, candidate))
        .collect::<Vec<_>>();

    EligibilityResult {
        is_eligible: failed_rules.is_empty(),
        reasons,
        failed_rules,
    }
}
