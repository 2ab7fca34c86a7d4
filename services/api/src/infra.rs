use campus_placement::error::AppError;
use campus_placement::workflows::placement::{
    ApplicationId, ApplicationRepository, CandidateEducation, EligibilityCriteria, JobApplication,
    JobPosting, PlacementDirectory, PostingEligibilityRecord, PostingId, PostingStatus,
    RepositoryError, StudentEducationRecord, StudentId, StudentRecord,
};
use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPlacementDirectory {
    postings: Arc<Mutex<HashMap<PostingId, JobPosting>>>,
    students: Arc<Mutex<Vec<StudentRecord>>>,
}

impl InMemoryPlacementDirectory {
    pub(crate) fn new(postings: Vec<JobPosting>, students: Vec<StudentRecord>) -> Self {
        let postings = postings
            .into_iter()
            .map(|posting| (posting.id.clone(), posting))
            .collect();
        Self {
            postings: Arc::new(Mutex::new(postings)),
            students: Arc::new(Mutex::new(students)),
        }
    }

    pub(crate) fn posting_count(&self) -> usize {
        self.postings.lock().expect("directory mutex poisoned").len()
    }

    pub(crate) fn student_count(&self) -> usize {
        self.students.lock().expect("directory mutex poisoned").len()
    }
}

impl PlacementDirectory for InMemoryPlacementDirectory {
    fn posting(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.postings.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.students.lock().expect("directory mutex poisoned");
        Ok(guard.iter().find(|student| &student.id == id).cloned())
    }

    fn students(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        Ok(self.students.lock().expect("directory mutex poisoned").clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, JobApplication>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: JobApplication) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.posting_id == application.posting_id
                && existing.student_id == application.student_id
        });
        if duplicate || guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: JobApplication) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_posting(&self, posting_id: &PostingId) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.posting_id == posting_id)
            .cloned()
            .collect())
    }

    fn find(
        &self,
        posting_id: &PostingId,
        student_id: &StudentId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|application| {
                &application.posting_id == posting_id && &application.student_id == student_id
            })
            .cloned())
    }
}

/// Posting entry as exported by the admin panel.
#[derive(Debug, Deserialize)]
pub(crate) struct PostingFileEntry {
    pub(crate) id: String,
    pub(crate) company: String,
    pub(crate) role: String,
    #[serde(rename = "ctcLpa", alias = "ctc_lpa", alias = "ctc", default)]
    pub(crate) ctc_lpa: f64,
    pub(crate) deadline: DateTime<Utc>,
    #[serde(default = "open_status")]
    pub(crate) status: PostingStatus,
    #[serde(default)]
    pub(crate) eligibility: PostingEligibilityRecord,
}

fn open_status() -> PostingStatus {
    PostingStatus::Open
}

impl TryFrom<PostingFileEntry> for JobPosting {
    type Error = AppError;

    fn try_from(entry: PostingFileEntry) -> Result<Self, Self::Error> {
        Ok(JobPosting {
            id: PostingId(entry.id),
            company: entry.company,
            role: entry.role,
            ctc_lpa: entry.ctc_lpa,
            deadline: entry.deadline,
            status: entry.status,
            eligibility: EligibilityCriteria::try_from(entry.eligibility)?,
        })
    }
}

pub(crate) fn load_postings(path: &Path) -> Result<Vec<JobPosting>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let entries: Vec<PostingFileEntry> = serde_json::from_str(&raw)?;
    entries.into_iter().map(JobPosting::try_from).collect()
}

pub(crate) fn load_criteria(path: &Path) -> Result<EligibilityCriteria, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let record: PostingEligibilityRecord = serde_json::from_str(&raw)?;
    Ok(EligibilityCriteria::try_from(record)?)
}

pub(crate) fn load_candidate(path: &Path) -> Result<CandidateEducation, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let record: StudentEducationRecord = serde_json::from_str(&raw)?;
    Ok(CandidateEducation::try_from(record)?)
}

/// Sample drives for local runs: an open CS drive, an open all-branch drive,
/// and a closed one.
pub(crate) fn demo_postings(now: DateTime<Utc>) -> Vec<JobPosting> {
    vec![
        JobPosting {
            id: PostingId("drive-acme-2025".to_string()),
            company: "Acme Systems".to_string(),
            role: "Graduate Software Engineer".to_string(),
            ctc_lpa: 12.0,
            deadline: now + Duration::days(14),
            status: PostingStatus::Open,
            eligibility: EligibilityCriteria {
                min_cgpa: 7.0,
                min_tenth_percent: 80.0,
                min_twelfth_percent: 75.0,
                min_diploma_percent: 60.0,
                max_backlogs: 0,
                passing_year: Some(2025),
                allowed_branches: vec![
                    "Computer".to_string(),
                    "Information Technology".to_string(),
                ],
            },
        },
        JobPosting {
            id: PostingId("drive-globex-2025".to_string()),
            company: "Globex Manufacturing".to_string(),
            role: "Graduate Engineer Trainee".to_string(),
            ctc_lpa: 6.5,
            deadline: now + Duration::days(7),
            status: PostingStatus::Open,
            eligibility: EligibilityCriteria {
                min_cgpa: 6.0,
                min_tenth_percent: 60.0,
                min_twelfth_percent: 60.0,
                min_diploma_percent: 60.0,
                max_backlogs: 1,
                passing_year: None,
                allowed_branches: vec!["All".to_string()],
            },
        },
        JobPosting {
            id: PostingId("drive-initech-2024".to_string()),
            company: "Initech".to_string(),
            role: "Support Engineer".to_string(),
            ctc_lpa: 4.5,
            deadline: now - Duration::days(30),
            status: PostingStatus::Closed,
            eligibility: EligibilityCriteria::default(),
        },
    ]
}

pub(crate) fn demo_students() -> Vec<StudentRecord> {
    let student = |id: &str, name: &str, education: Option<CandidateEducation>| StudentRecord {
        id: StudentId(id.to_string()),
        name: name.to_string(),
        education,
    };

    vec![
        student(
            "stu-asha",
            "Asha Patil",
            Some(CandidateEducation {
                branch: "Computer Engineering".to_string(),
                cgpa: 8.2,
                tenth_percent: 88.0,
                twelfth_percent: Some(81.0),
                diploma_percent: None,
                backlogs: 0,
                passing_year: 2025,
            }),
        ),
        student(
            "stu-rohan",
            "Rohan Desai",
            Some(CandidateEducation {
                branch: "Mechanical Engineering".to_string(),
                cgpa: 7.1,
                tenth_percent: 76.0,
                twelfth_percent: None,
                diploma_percent: Some(72.0),
                backlogs: 1,
                passing_year: 2025,
            }),
        ),
        student(
            "stu-kabir",
            "Kabir Shah",
            Some(CandidateEducation {
                branch: "Information Technology".to_string(),
                cgpa: 6.5,
                tenth_percent: 91.0,
                twelfth_percent: Some(70.0),
                diploma_percent: None,
                backlogs: 2,
                passing_year: 2025,
            }),
        ),
        student("stu-meera", "Meera Joshi", None),
    ]
}
