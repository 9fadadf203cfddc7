//! Parse task CSV exports into raw rows.
//!
//! Expected header (column order is free, extra columns are ignored):
//! title,energy,work_type,time,priority,value,goal
//!
//! Cells are kept as text here; `crate::importer` turns them into typed tasks
//! so errors can name the offending row.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// A raw task row as it appears in the CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRow {
    /// 1-based line in the source file (header is line 1).
    #[serde(skip)]
    pub line: usize,
    pub title: String,
    #[serde(alias = "energy_required")]
    pub energy: Option<String>,
    #[serde(alias = "type")]
    pub work_type: Option<String>,
    #[serde(alias = "time_estimate")]
    pub time: Option<String>,
    pub priority: Option<String>,
    #[serde(alias = "estimated_value")]
    pub value: Option<String>,
    pub goal: Option<String>,
}

impl TaskRow {
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }
}

/// Parse a task CSV file, returning every row (blank ones included).
pub fn parse_tasks_csv(path: impl AsRef<Path>) -> Result<Vec<TaskRow>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_tasks_reader(file).with_context(|| format!("parsing {}", path.as_ref().display()))
}

pub fn parse_tasks_reader<R: Read>(reader: R) -> Result<Vec<TaskRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("reading header row")?.clone();
    let mut record = csv::StringRecord::new();
    let mut rows = Vec::new();

    // Empty lines are skipped and quoted cells may span lines, so the line
    // comes from the record position, not the record count.
    while rdr.read_record(&mut record).context("reading csv")? {
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        let mut row: TaskRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("reading row {line}"))?;
        row.line = line;
        rows.push(row);
    }

    Ok(rows)
}
