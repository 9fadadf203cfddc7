//! Turn raw CSV rows into typed tasks and add them to a store.
//!
//! Conversion is all-or-nothing: every row is converted before any task is
//! added, so one bad cell leaves the store untouched.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use current_core::goals::Goal;
use current_core::routing::route_to_goal;
use current_core::task::{NewTask, Priority, TimeEstimate};
use current_core::task_store::TaskStore;

use crate::tag_rules::infer_tags;
use crate::task_csv::TaskRow;

static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?\s*(\d{1,3}(?:,\d{3})+|\d+)(\.\d+)?$").expect("money pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids assigned to the new tasks, in file order.
    pub added: Vec<String>,
    /// Rows without a title.
    pub skipped: usize,
    /// (line, goal text) for goal cells that matched no goal.
    pub unmatched_goals: Vec<(usize, String)>,
}

/// Parse a money cell like `1200`, `$1,200` or `350.50`.
pub fn parse_money(cell: &str) -> Result<f64> {
    let s = cell.trim();
    let caps = MONEY
        .captures(s)
        .ok_or_else(|| anyhow!("invalid amount '{s}'"))?;
    let whole = caps[1].replace(',', "");
    let frac = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    Ok(format!("{whole}{frac}").parse()?)
}

fn cell(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Convert one row. Blank tag cells fall back to title inference (energy,
/// work type) or the form defaults (time, priority).
pub fn row_to_new_task(row: &TaskRow, goals: &[Goal]) -> Result<(NewTask, Option<String>)> {
    let inferred = infer_tags(&row.title);
    let mut task = NewTask::new(row.title.trim());

    task.energy_required = match cell(&row.energy) {
        Some(s) => s.parse()?,
        None => inferred.energy,
    };
    task.work_type = match cell(&row.work_type) {
        Some(s) => s.parse()?,
        None => inferred.work_type,
    };
    task.time_estimate = match cell(&row.time) {
        Some(s) => s.parse()?,
        None => TimeEstimate::Medium,
    };
    task.priority = match cell(&row.priority) {
        Some(s) => s.parse()?,
        None => Priority::ShouldDo,
    };
    task.estimated_value = cell(&row.value).map(parse_money).transpose()?;

    let mut unmatched = None;
    if let Some(text) = cell(&row.goal) {
        let route = route_to_goal(text, goals);
        match route.goal_index {
            Some(idx) => {
                debug!(line = row.line, goal = %goals[idx].id, reason = %route.reason, "goal routed");
                task.goal_id = Some(goals[idx].id.clone());
            }
            None => unmatched = Some(text.to_string()),
        }
    }

    task.validate()?;
    Ok((task, unmatched))
}

/// Add every non-blank row to `store`.
pub fn import_rows(
    rows: &[TaskRow],
    store: &mut TaskStore,
    goals: &[Goal],
    now: DateTime<Utc>,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let mut pending = Vec::new();

    for row in rows {
        if row.is_blank() {
            report.skipped += 1;
            continue;
        }
        let (task, unmatched) =
            row_to_new_task(row, goals).with_context(|| format!("row {}", row.line))?;
        if let Some(text) = unmatched {
            report.unmatched_goals.push((row.line, text));
        }
        pending.push(task);
    }

    for task in pending {
        let added = store.add(task, now)?;
        report.added.push(added.id.clone());
    }

    info!(
        added = report.added.len(),
        skipped = report.skipped,
        unmatched_goals = report.unmatched_goals.len(),
        "tasks imported"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_csv::parse_tasks_reader;
    use chrono::TimeZone;
    use current_core::goals::Horizon;
    use current_core::task::{EnergyRequired, WorkType};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn goals() -> Vec<Goal> {
        vec![Goal::new("g-0001", "Grow the bakery", Horizon::Medium, now())]
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("1200").unwrap(), 1200.0);
        assert_eq!(parse_money("$1,200").unwrap(), 1200.0);
        assert_eq!(parse_money(" $ 350.50 ").unwrap(), 350.5);
        assert_eq!(parse_money("12,345,678.9").unwrap(), 12_345_678.9);
        assert!(parse_money("-5").is_err());
        assert!(parse_money("1,20").is_err());
        assert!(parse_money("lots").is_err());
    }

    #[test]
    fn test_blank_cells_fall_back() {
        let rows = parse_tasks_reader("title,energy\nReply to supplier email,\n".as_bytes()).unwrap();
        let (task, unmatched) = row_to_new_task(&rows[0], &goals()).unwrap();
        assert_eq!(task.work_type, WorkType::Communication);
        assert_eq!(task.energy_required, EnergyRequired::Low);
        assert_eq!(task.time_estimate, TimeEstimate::Medium);
        assert_eq!(task.priority, Priority::ShouldDo);
        assert_eq!(task.estimated_value, None);
        assert_eq!(unmatched, None);
    }

    #[test]
    fn test_goal_cell_routes_or_reports() {
        let csv = "title,goal\nOrder flour,bakery\nPlan trip,Visit Japan\n";
        let rows = parse_tasks_reader(csv.as_bytes()).unwrap();

        let mut store = TaskStore::new();
        let report = import_rows(&rows, &mut store, &goals(), now()).unwrap();
        assert_eq!(report.added, vec!["t-0001", "t-0002"]);
        assert_eq!(store.get("t-0001").unwrap().goal_id.as_deref(), Some("g-0001"));
        assert_eq!(store.get("t-0002").unwrap().goal_id, None);
        assert_eq!(report.unmatched_goals, vec![(3, "Visit Japan".to_string())]);
    }

    #[test]
    fn test_bad_cell_aborts_whole_import() {
        let csv = "title,priority\nFirst,must_do\nSecond,urgent-ish\n";
        let rows = parse_tasks_reader(csv.as_bytes()).unwrap();

        let mut store = TaskStore::new();
        let err = import_rows(&rows, &mut store, &[], now()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("row 3"), "{msg}");
        assert!(msg.contains("priority"), "{msg}");
        assert!(store.is_empty());
    }

    #[test]
    fn test_error_names_file_line_after_blank_line() {
        let csv = "title,priority\nFirst,must_do\n\nSecond,urgent-ish\n";
        let rows = parse_tasks_reader(csv.as_bytes()).unwrap();

        let mut store = TaskStore::new();
        let msg = format!("{:#}", import_rows(&rows, &mut store, &[], now()).unwrap_err());
        assert!(msg.contains("row 4"), "{msg}");
        assert!(store.is_empty());
    }
}
