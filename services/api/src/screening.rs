use crate::infra::{load_candidate, load_criteria};
use campus_placement::error::AppError;
use campus_placement::workflows::placement::{evaluate, EligibilityResult};
use campus_placement::workflows::roster::{screen_roster, tally, RosterImporter, ScreeningOutcome};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file with posting eligibility criteria (admin panel shape)
    #[arg(long)]
    pub(crate) criteria: PathBuf,
    /// JSON file with the student's education section
    #[arg(long)]
    pub(crate) candidate: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// JSON file with posting eligibility criteria (admin panel shape)
    #[arg(long)]
    pub(crate) criteria: PathBuf,
    /// Roster CSV exported by the placement cell
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Print only eligible students
    #[arg(long)]
    pub(crate) only_eligible: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let criteria = load_criteria(&args.criteria)?;
    let candidate = load_candidate(&args.candidate)?;

    let result = evaluate(&criteria, &candidate);
    print_result(&result);
    Ok(())
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let criteria = load_criteria(&args.criteria)?;
    let students = RosterImporter::from_path(&args.roster)?;

    let outcomes = screen_roster(&criteria, &students);
    for outcome in outcomes
        .iter()
        .filter(|outcome| !args.only_eligible || outcome.is_eligible())
    {
        println!("{}", screening_line(outcome));
    }

    let counts = tally(&outcomes);
    println!(
        "\n{} eligible | {} not eligible | {} without education details",
        counts.eligible, counts.ineligible, counts.incomplete
    );
    Ok(())
}

pub(crate) fn print_result(result: &EligibilityResult) {
    if result.is_eligible {
        println!("Eligible");
        return;
    }

    println!("Not eligible");
    for reason in &result.reasons {
        println!("  - {}", reason);
    }
}

pub(crate) fn screening_line(outcome: &ScreeningOutcome) -> String {
    let verdict = match &outcome.result {
        Some(result) => result.summary(),
        None => "education details not filled".to_string(),
    };
    format!("{:<12} {:<24} {}", outcome.student_id.0, outcome.name, verdict)
}
