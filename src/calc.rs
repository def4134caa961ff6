use serde::Serialize;

use crate::roster::{Semester, StudentRecord, SEMESTER_COUNT};

#[derive(Debug, Clone, Serialize)]
pub struct CalcError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CalcError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Extremal value of one semester column together with the row that holds it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extreme {
    pub value: f64,
    pub roll_number: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterStats {
    pub semester: String,
    pub mean: f64,
    pub max: Extreme,
    pub min: Extreme,
    pub scored_count: usize,
    pub missing_count: usize,
}

/// Mean/max/min for the requested columns, over present scores only. Ties
/// resolve to the first row in roster order. A roster with zero rows, or a
/// requested column with no present value, aborts the whole aggregation:
/// its mean is undefined.
pub fn aggregate(
    roster: &[StudentRecord],
    semesters: &[Semester],
) -> Result<Vec<SemesterStats>, CalcError> {
    if roster.is_empty() {
        return Err(CalcError::new("empty_dataset", "roster has no rows"));
    }

    let mut out = Vec::with_capacity(semesters.len());
    for &sem in semesters {
        let mut sum = 0.0;
        let mut scored_count = 0usize;
        let mut max: Option<(f64, usize)> = None;
        let mut min: Option<(f64, usize)> = None;

        for (row, record) in roster.iter().enumerate() {
            let Some(v) = record.score(sem) else {
                continue;
            };
            sum += v;
            scored_count += 1;
            // Strict comparisons keep the first row on ties.
            if max.map(|(best, _)| v > best).unwrap_or(true) {
                max = Some((v, row));
            }
            if min.map(|(best, _)| v < best).unwrap_or(true) {
                min = Some((v, row));
            }
        }

        let (Some((max_v, max_row)), Some((min_v, min_row))) = (max, min) else {
            return Err(CalcError::new(
                "empty_dataset",
                format!("no recorded scores in column {}", sem.label()),
            ));
        };

        out.push(SemesterStats {
            semester: sem.label().to_string(),
            mean: sum / scored_count as f64,
            max: extreme(max_v, &roster[max_row]),
            min: extreme(min_v, &roster[min_row]),
            scored_count,
            missing_count: roster.len() - scored_count,
        });
    }
    Ok(out)
}

fn extreme(value: f64, record: &StudentRecord) -> Extreme {
    Extreme {
        value,
        roll_number: record.roll_number.clone(),
        name: record.name.clone(),
    }
}

/// Per-semester class mean with `None` where a column has no recorded score.
/// The student view tolerates empty columns as chart gaps; only the class
/// aggregate view hard-fails on them.
pub fn class_mean_series(roster: &[StudentRecord]) -> [Option<f64>; SEMESTER_COUNT] {
    let mut out = [None; SEMESTER_COUNT];
    for (sem, slot) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        let mut n = 0usize;
        for record in roster {
            if let Some(v) = record.scores[sem] {
                sum += v;
                n += 1;
            }
        }
        if n > 0 {
            *slot = Some(sum / n as f64);
        }
    }
    out
}
