use serde::Serialize;
use std::path::Path;

pub const SEMESTER_COUNT: usize = 5;
pub const SEMESTER_LABELS: [&str; SEMESTER_COUNT] = ["sem-I", "sem-II", "sem-III", "sem-IV", "sem-V"];

/// The five score columns, positional and fixed. Scores are only ever
/// addressed through this enum; there is no by-string column access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semester {
    I,
    II,
    III,
    IV,
    V,
}

impl Semester {
    pub const ALL: [Semester; SEMESTER_COUNT] =
        [Semester::I, Semester::II, Semester::III, Semester::IV, Semester::V];

    pub fn index(self) -> usize {
        match self {
            Semester::I => 0,
            Semester::II => 1,
            Semester::III => 2,
            Semester::IV => 3,
            Semester::V => 4,
        }
    }

    pub fn label(self) -> &'static str {
        SEMESTER_LABELS[self.index()]
    }
}

const COL_ROLL: &str = "Roll NO";
const COL_NAME: &str = "Name of students";
const COL_GENDER: &str = "Gender";
const COL_PRN: &str = "PRN NO";
const COL_STUDENT_MOBILE: &str = "Students Mob. No";
const COL_PARENT_MOBILE: &str = "Parents Mob. No";
const COL_STUDENT_EMAIL: &str = "students mail id";
const COL_PARENT_EMAIL: &str = "parents mail id";
const COL_PERMANENT_ADDRESS: &str = "Per. Address";
const COL_RESIDENTIAL_ADDRESS: &str = "residential Address";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "other")]
    Other,
}

impl Gender {
    pub fn parse(raw: &str) -> Gender {
        match raw.trim() {
            "M" => Gender::Male,
            "F" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub roll_number: String,
    pub name: String,
    pub gender: Gender,
    pub prn_number: String,
    pub student_mobile: Option<String>,
    pub parent_mobile: Option<String>,
    pub student_email: Option<String>,
    pub parent_email: Option<String>,
    pub permanent_address: Option<String>,
    pub residential_address: Option<String>,
    /// One slot per semester, in `SEMESTER_LABELS` order. `None` = not yet recorded.
    pub scores: [Option<f64>; SEMESTER_COUNT],
}

impl StudentRecord {
    /// Composite string the shell shows in its student selector.
    pub fn display_name(&self) -> String {
        format!("{} -- {}", self.name, self.roll_number)
    }

    pub fn score(&self, semester: Semester) -> Option<f64> {
        self.scores[semester.index()]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterError {
    pub code: String,
    pub message: String,
}

impl RosterError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of a roster lookup. Ambiguity is surfaced to the caller instead of
/// silently resolving to the first row in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    None,
    Unique(usize),
    Ambiguous(Vec<usize>),
}

struct ColumnMap {
    roll: usize,
    name: usize,
    gender: usize,
    prn: usize,
    student_mobile: Option<usize>,
    parent_mobile: Option<usize>,
    student_email: Option<usize>,
    parent_email: Option<usize>,
    permanent_address: Option<usize>,
    residential_address: Option<usize>,
    semesters: [usize; SEMESTER_COUNT],
}

fn header_index(headers: &csv::StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == column)
}

fn required_index(headers: &csv::StringRecord, column: &str) -> Result<usize, RosterError> {
    header_index(headers, column).ok_or_else(|| {
        RosterError::new(
            "data_format",
            format!("roster is missing required column: {}", column),
        )
    })
}

fn map_columns(headers: &csv::StringRecord) -> Result<ColumnMap, RosterError> {
    let mut semesters = [0usize; SEMESTER_COUNT];
    for (slot, label) in semesters.iter_mut().zip(SEMESTER_LABELS) {
        *slot = required_index(headers, label)?;
    }
    Ok(ColumnMap {
        roll: required_index(headers, COL_ROLL)?,
        name: required_index(headers, COL_NAME)?,
        gender: required_index(headers, COL_GENDER)?,
        prn: required_index(headers, COL_PRN)?,
        student_mobile: header_index(headers, COL_STUDENT_MOBILE),
        parent_mobile: header_index(headers, COL_PARENT_MOBILE),
        student_email: header_index(headers, COL_STUDENT_EMAIL),
        parent_email: header_index(headers, COL_PARENT_EMAIL),
        permanent_address: header_index(headers, COL_PERMANENT_ADDRESS),
        residential_address: header_index(headers, COL_RESIDENTIAL_ADDRESS),
        semesters,
    })
}

fn cell(row: &csv::StringRecord, idx: usize) -> String {
    row.get(idx).unwrap_or("").trim().to_string()
}

fn optional_cell(row: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    let idx = idx?;
    let v = cell(row, idx);
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

/// Non-numeric or empty score cells coerce to `None`; they never fail the load.
fn score_cell(row: &csv::StringRecord, idx: usize) -> Option<f64> {
    let v = cell(row, idx);
    if v.is_empty() {
        return None;
    }
    v.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Load the whole roster from a delimited file, in file order. Duplicate roll
/// numbers are tolerated here; lookup reports them as ambiguous.
pub fn load(path: &Path) -> Result<Vec<StudentRecord>, RosterError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        RosterError::new("io_failed", format!("cannot open roster {}: {}", path.display(), e))
    })?;
    let headers = reader
        .headers()
        .map_err(|e| RosterError::new("data_format", format!("unreadable roster header: {}", e)))?
        .clone();
    let cols = map_columns(&headers)?;

    let mut roster = Vec::new();
    for row in reader.records() {
        let row =
            row.map_err(|e| RosterError::new("data_format", format!("unreadable roster row: {}", e)))?;
        let mut scores = [None; SEMESTER_COUNT];
        for (slot, idx) in scores.iter_mut().zip(cols.semesters) {
            *slot = score_cell(&row, idx);
        }
        roster.push(StudentRecord {
            roll_number: cell(&row, cols.roll),
            name: cell(&row, cols.name),
            gender: Gender::parse(&cell(&row, cols.gender)),
            prn_number: cell(&row, cols.prn),
            student_mobile: optional_cell(&row, cols.student_mobile),
            parent_mobile: optional_cell(&row, cols.parent_mobile),
            student_email: optional_cell(&row, cols.student_email),
            parent_email: optional_cell(&row, cols.parent_email),
            permanent_address: optional_cell(&row, cols.permanent_address),
            residential_address: optional_cell(&row, cols.residential_address),
            scores,
        });
    }
    Ok(roster)
}

pub fn get_by_roll<'a>(roster: &'a [StudentRecord], roll_number: &str) -> Option<&'a StudentRecord> {
    roster.iter().find(|r| r.roll_number == roll_number)
}

/// Substring match on the roll number. An exact whole-roll match wins outright
/// even when it is also a substring of other rolls, so exact selections made
/// from a `display_name` list never come back ambiguous.
pub fn find(roster: &[StudentRecord], query: &str) -> Lookup {
    let q = query.trim();
    if q.is_empty() {
        return Lookup::None;
    }
    let hits: Vec<usize> = roster
        .iter()
        .enumerate()
        .filter(|(_, r)| r.roll_number.contains(q))
        .map(|(i, _)| i)
        .collect();
    match hits.len() {
        0 => Lookup::None,
        1 => Lookup::Unique(hits[0]),
        _ => {
            let exact: Vec<usize> = hits
                .iter()
                .copied()
                .filter(|&i| roster[i].roll_number == q)
                .collect();
            match exact.len() {
                1 => Lookup::Unique(exact[0]),
                // Duplicate rolls in the file stay ambiguous even for an
                // exact query; the candidates narrow to the duplicates.
                0 => Lookup::Ambiguous(hits),
                _ => Lookup::Ambiguous(exact),
            }
        }
    }
}
