use crate::infra::{
    demo_postings, demo_students, load_postings, InMemoryApplicationRepository,
    InMemoryPlacementDirectory,
};
use crate::screening::print_result;
use campus_placement::error::AppError;
use campus_placement::workflows::placement::{
    ApplicationStatus, ApplicationView, PlacementService, PlacementServiceError, PostingId,
};
use campus_placement::workflows::roster::RosterImporter;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Posting to walk through (defaults to the first open sample drive)
    #[arg(long)]
    pub(crate) posting: Option<String>,
    /// Optional JSON file of postings to use instead of the sample drives
    #[arg(long)]
    pub(crate) postings: Option<PathBuf>,
    /// Optional roster CSV to use instead of the sample students
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Stop after the eligibility checks
    #[arg(long)]
    pub(crate) skip_applications: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        posting,
        postings,
        roster,
        skip_applications,
    } = args;

    let now = Utc::now();
    let postings = match postings {
        Some(path) => load_postings(&path)?,
        None => demo_postings(now),
    };
    let students = match roster {
        Some(path) => RosterImporter::from_path(path)?,
        None => demo_students(),
    };

    println!("Campus placement eligibility demo");
    println!("Drives:");
    for drive in &postings {
        println!(
            "- {} | {} ({}) | {:.1} LPA | {} | closes {}",
            drive.id,
            drive.company,
            drive.role,
            drive.ctc_lpa,
            drive.status.label(),
            drive.deadline.format("%Y-%m-%d")
        );
    }

    let posting_id = match posting {
        Some(id) => PostingId(id),
        None => match postings.iter().find(|drive| drive.accepts_applications_at(now)) {
            Some(drive) => drive.id.clone(),
            None => {
                println!("No drive is currently accepting applications");
                return Ok(());
            }
        },
    };

    let student_ids = students
        .iter()
        .map(|student| (student.id.clone(), student.name.clone()))
        .collect::<Vec<_>>();
    let directory = Arc::new(InMemoryPlacementDirectory::new(postings, students));
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = PlacementService::new(directory, repository);

    println!("\nEligibility for {}", posting_id);
    for (student_id, name) in &student_ids {
        print!("{} ({}): ", name, student_id);
        match service.check(&posting_id, student_id) {
            Ok(report) => print_result(&report.result),
            Err(err) => println!("{}", err),
        }
    }

    if skip_applications {
        return Ok(());
    }

    println!("\nApplication gate");
    let mut accepted = Vec::new();
    for (student_id, name) in &student_ids {
        match service.apply(&posting_id, student_id, now) {
            Ok(application) => {
                println!("- {} applied as {}", name, application.id);
                accepted.push(application.id);
            }
            Err(PlacementServiceError::Ineligible { reasons }) => {
                println!("- {} blocked: {}", name, reasons.join("; "));
            }
            Err(err) => println!("- {} blocked: {}", name, err),
        }
    }

    if let Some((first, rest)) = accepted.split_first() {
        println!();
        for (ids, status) in [
            (std::slice::from_ref(first), ApplicationStatus::Selected),
            (rest, ApplicationStatus::Shortlisted),
        ] {
            if ids.is_empty() {
                continue;
            }
            match service.update_statuses(ids, status) {
                Ok(outcome) => println!(
                    "Marked {} application(s) {}",
                    outcome.updated.len(),
                    status.label()
                ),
                Err(err) => println!("Status update failed: {}", err),
            }
        }
    }

    match service.applications(&posting_id) {
        Ok(applications) => {
            let views = applications
                .iter()
                .map(ApplicationView::from)
                .collect::<Vec<_>>();
            match serde_json::to_string_pretty(&views) {
                Ok(json) => println!("\nApplications payload:\n{}", json),
                Err(err) => println!("\nApplications payload unavailable: {}", err),
            }
        }
        Err(err) => println!("\nApplications unavailable: {}", err),
    }

    match service.stats(&posting_id) {
        Ok(stats) => println!(
            "\nStats: {} eligible | {} applied | {} shortlisted | {} selected | {} rejected",
            stats.eligible, stats.applied, stats.shortlisted, stats.selected, stats.rejected
        ),
        Err(err) => println!("\nStats unavailable: {}", err),
    }

    Ok(())
}
