use serde::{Deserialize, Serialize};

const ALL_BRANCHES_SENTINEL: &str = "all";

/// Thresholds and branch restrictions attached to a job posting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    pub min_cgpa: f64,
    pub min_tenth_percent: f64,
    pub min_twelfth_percent: f64,
    pub min_diploma_percent: f64,
    pub max_backlogs: u32,
    pub passing_year: Option<u16>,
    pub allowed_branches: Vec<String>,
}

impl EligibilityCriteria {
    /// Whether a candidate branch clears the branch restriction.
    ///
    /// An entry matches when it is the `All` sentinel (any casing) or a
    /// case-insensitive substring of the candidate branch, so `"Computer"`
    /// admits `"Computer Engineering"`. An empty list places no restriction.
    pub fn admits_branch(&self, branch: &str) -> bool {
        if self.allowed_branches.is_empty() {
            return true;
        }

        let branch = branch.to_lowercase();
        self.allowed_branches.iter().any(|allowed| {
            let allowed = allowed.trim().to_lowercase();
            allowed == ALL_BRANCHES_SENTINEL || branch.contains(&allowed)
        })
    }
}
