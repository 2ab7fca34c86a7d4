use serde::Serialize;

use crate::workflows::placement::{
    evaluate, EligibilityCriteria, EligibilityResult, StudentId, StudentRecord,
};

/// One roster row checked against a posting's criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningOutcome {
    pub student_id: StudentId,
    pub name: String,
    /// `None` when the student has no education details to evaluate.
    pub result: Option<EligibilityResult>,
}

impl ScreeningOutcome {
    pub fn is_eligible(&self) -> bool {
        self.result.as_ref().is_some_and(|result| result.is_eligible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScreeningTally {
    pub eligible: usize,
    pub ineligible: usize,
    pub incomplete: usize,
}

pub fn screen_roster(
    criteria: &EligibilityCriteria,
    students: &[StudentRecord],
) -> Vec<ScreeningOutcome> {
    students
        .iter()
        .map(|student| ScreeningOutcome {
            student_id: student.id.clone(),
            name: student.name.clone(),
            result: student
                .education
                .as_ref()
                .map(|education| evaluate(criteria, education)),
        })
        .collect()
}

pub fn tally(outcomes: &[ScreeningOutcome]) -> ScreeningTally {
    outcomes
        .iter()
        .fold(ScreeningTally::default(), |mut tally, outcome| {
            match &outcome.result {
                Some(result) if result.is_eligible => tally.eligible += 1,
                Some(_) => tally.ineligible += 1,
                None => tally.incomplete += 1,
            }
            tally
        })
}
