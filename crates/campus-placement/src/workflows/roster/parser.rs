use crate::workflows::placement::records::StudentEducationRecord;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct RosterRow {
    pub(crate) line: u64,
    pub(crate) student_id: String,
    pub(crate) name: String,
    /// `None` when the student has not filled any education details.
    pub(crate) education: Option<StudentEducationRecord>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut rows = Vec::new();

    while csv_reader.read_record(&mut record)? {
        // Quoted cells may span lines, so take the line from the reader.
        let line = record.position().map(|position| position.line()).unwrap_or_default();
        let raw: RawRosterRow = record.deserialize(Some(&headers))?;
        let education = raw.education();

        rows.push(RosterRow {
            line,
            student_id: raw.student_id,
            name: raw.name.unwrap_or_default(),
            education,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawRosterRow {
    #[serde(rename = "Student ID")]
    student_id: String,
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Branch", default, deserialize_with = "empty_string_as_none")]
    branch: Option<String>,
    #[serde(rename = "CGPA", default, deserialize_with = "empty_number_as_none")]
    cgpa: Option<f64>,
    #[serde(rename = "10th %", default, deserialize_with = "empty_number_as_none")]
    tenth_percent: Option<f64>,
    #[serde(rename = "12th %", default, deserialize_with = "empty_number_as_none")]
    twelfth_percent: Option<f64>,
    #[serde(rename = "Diploma %", default, deserialize_with = "empty_number_as_none")]
    diploma_percent: Option<f64>,
    #[serde(rename = "Backlogs", default, deserialize_with = "empty_number_as_none")]
    backlogs: Option<f64>,
    #[serde(
        rename = "Passing Year",
        default,
        deserialize_with = "empty_number_as_none"
    )]
    passing_year: Option<f64>,
}

impl RawRosterRow {
    fn education(&self) -> Option<StudentEducationRecord> {
        if self.branch.is_none() && self.cgpa.is_none() {
            return None;
        }

        Some(StudentEducationRecord {
            branch: self.branch.clone(),
            cgpa: self.cgpa,
            tenth_percent: self.tenth_percent,
            twelfth_percent: self.twelfth_percent,
            diploma_percent: self.diploma_percent,
            backlogs: self.backlogs,
            passing_year: self.passing_year,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_number_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|err| serde::de::Error::custom(format!("invalid number '{raw}': {err}"))),
    }
}
