mod parser;
mod screening;

use crate::workflows::placement::{CandidateEducation, RecordError, StudentId, StudentRecord};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::warn;

pub use screening::{screen_roster, tally, ScreeningOutcome, ScreeningTally};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Record { line: u64, source: RecordError },
    MissingStudentId { line: u64 },
    DuplicateStudent { line: u64, student_id: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read student roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Record { line, source } => {
                write!(f, "roster line {}: {}", line, source)
            }
            RosterImportError::MissingStudentId { line } => {
                write!(f, "roster line {} has no student id", line)
            }
            RosterImportError::DuplicateStudent { line, student_id } => write!(
                f,
                "roster line {} repeats student id '{}'",
                line, student_id
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Record { source, .. } => Some(source),
            RosterImportError::MissingStudentId { .. }
            | RosterImportError::DuplicateStudent { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a placement-cell roster export into student records.
///
/// Rows without a branch or CGPA are kept as students who have not filled
/// their education section yet.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<StudentRecord>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<StudentRecord>, RosterImportError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut students = Vec::new();

        for row in parser::parse_rows(reader)? {
            let student_id = row.student_id.trim().to_string();
            if student_id.is_empty() {
                return Err(RosterImportError::MissingStudentId { line: row.line });
            }
            if !seen.insert(student_id.clone()) {
                return Err(RosterImportError::DuplicateStudent {
                    line: row.line,
                    student_id,
                });
            }

            let education = match row.education {
                Some(record) => Some(CandidateEducation::try_from(record).map_err(|source| {
                    RosterImportError::Record {
                        line: row.line,
                        source,
                    }
                })?),
                None => {
                    warn!(%student_id, line = row.line, "roster row has no education details");
                    None
                }
            };

            students.push(StudentRecord {
                id: StudentId(student_id),
                name: row.name,
                education,
            });
        }

        Ok(students)
    }
}
