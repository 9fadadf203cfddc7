use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Subcommand;
use current_core::{
    goal_title, parse_defer_until, route_to_goal, Goal, NewTask, RouteConfidence, Task,
    TaskStatus,
};
use current_import::{import_rows, infer_tags, parse_money, parse_tasks_csv};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::state::{load_goals, load_tasks, local_today, save_tasks};

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task. Energy and work type are guessed from the title when omitted
    Add {
        title: String,

        /// low, medium, high
        #[arg(long)]
        energy: Option<String>,

        /// deep_work, admin, creative, communication, learning, physical, light_lift, steady_focus
        #[arg(long)]
        work_type: Option<String>,

        /// tiny, short, medium, long, extended
        #[arg(long, default_value = "medium")]
        time: String,

        /// must_do, should_do, could_do, someday
        #[arg(long, default_value = "should_do")]
        priority: String,

        /// Estimated value in dollars (e.g. 1200 or $1,200)
        #[arg(long)]
        value: Option<String>,

        /// Goal id or title (fuzzy)
        #[arg(long)]
        goal: Option<String>,
    },

    /// List tasks (active and deferred unless --all)
    List {
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Mark a task done
    Complete { id: String },

    /// Push a task to a later day
    Defer {
        id: String,

        /// YYYY-MM-DD, tomorrow, next-week or +N (default from config.tasks.default_defer)
        #[arg(long)]
        until: Option<String>,
    },

    /// Drop a task without completing it
    Archive { id: String },

    /// Bulk-add tasks from a CSV file
    Import {
        /// CSV with a `title` column and optional energy/work_type/time/priority/value/goal
        path: PathBuf,
    },
}

pub fn run(cmd: TaskCommand, cfg: &Config) -> Result<()> {
    match cmd {
        TaskCommand::Add {
            title,
            energy,
            work_type,
            time,
            priority,
            value,
            goal,
        } => add(title, energy, work_type, &time, &priority, value, goal),
        TaskCommand::List { all } => list(all),
        TaskCommand::Complete { id } => complete(&id),
        TaskCommand::Defer { id, until } => {
            defer(&id, until.as_deref().unwrap_or(&cfg.tasks.default_defer))
        }
        TaskCommand::Archive { id } => archive(&id),
        TaskCommand::Import { path } => import(&path),
    }
}

fn add(
    title: String,
    energy: Option<String>,
    work_type: Option<String>,
    time: &str,
    priority: &str,
    value: Option<String>,
    goal: Option<String>,
) -> Result<()> {
    let inferred = infer_tags(&title);
    let mut new = NewTask::new(title.trim());
    new.energy_required = match energy {
        Some(s) => s.parse()?,
        None => inferred.energy,
    };
    new.work_type = match work_type {
        Some(s) => s.parse()?,
        None => inferred.work_type,
    };
    new.time_estimate = time.parse()?;
    new.priority = priority.parse()?;
    new.estimated_value = value.as_deref().map(parse_money).transpose()?;

    let goals = load_goals()?;
    if let Some(text) = goal {
        new.goal_id = Some(resolve_goal(&text, &goals)?.id.clone());
    }

    let mut store = load_tasks()?;
    let task = store.add(new, Utc::now())?;
    println!("Added {}", describe(task, &goals));
    save_tasks(&store)?;
    Ok(())
}

fn resolve_goal<'a>(text: &str, goals: &'a [Goal]) -> Result<&'a Goal> {
    let route = route_to_goal(text, goals);
    let Some(idx) = route.goal_index else {
        bail!("no goal matches '{text}' (see: current goal list)");
    };
    if route.confidence == RouteConfidence::Low {
        println!("Linked to '{}' ({})", goals[idx].title, route.reason);
    }
    Ok(&goals[idx])
}

fn list(all: bool) -> Result<()> {
    let store = load_tasks()?;
    let goals = load_goals()?;

    let shown: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| all || matches!(t.status, TaskStatus::Active | TaskStatus::Deferred))
        .collect();
    if shown.is_empty() {
        println!("No tasks. Add one with: current task add \"<title>\"");
        return Ok(());
    }
    for t in shown {
        println!("{}", describe(t, &goals));
    }
    Ok(())
}

fn complete(id: &str) -> Result<()> {
    let mut store = load_tasks()?;
    let task = store.complete(id, Utc::now())?;
    println!("Completed {} {}", task.id, task.title);
    save_tasks(&store)?;
    Ok(())
}

fn defer(id: &str, until: &str) -> Result<()> {
    let today = local_today(Utc::now())?;
    let day = parse_defer_until(until, today)?;

    let mut store = load_tasks()?;
    let task = store.defer(id, day)?;
    println!("Deferred {} {} until {}", task.id, task.title, day);
    save_tasks(&store)?;
    Ok(())
}

fn archive(id: &str) -> Result<()> {
    let mut store = load_tasks()?;
    let task = store.archive(id)?;
    println!("Archived {} {}", task.id, task.title);
    save_tasks(&store)?;
    Ok(())
}

fn import(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("CSV not found: {}", path.display());
    }
    let rows = parse_tasks_csv(path).with_context(|| format!("parsing {}", path.display()))?;
    let goals = load_goals()?;

    let mut store = load_tasks()?;
    let report = import_rows(&rows, &mut store, &goals, Utc::now())?;
    save_tasks(&store)?;
    info!(path = %path.display(), added = report.added.len(), "import saved");

    println!(
        "Imported {} tasks from {} ({} blank rows skipped)",
        report.added.len(),
        path.display(),
        report.skipped
    );
    for (line, text) in &report.unmatched_goals {
        println!("  line {line}: no goal matches '{text}', left unlinked");
    }
    Ok(())
}

fn describe(t: &Task, goals: &[Goal]) -> String {
    let mut out = format!(
        "{} {:<9} {}/{}/{}/{}  {}",
        t.id,
        t.status.as_str(),
        t.energy_required,
        t.work_type,
        t.time_estimate,
        t.priority,
        t.title
    );
    if let Some(value) = t.estimated_value {
        out.push_str(&format!("  ${value}"));
    }
    if let Some(day) = t.deferred_until {
        out.push_str(&format!("  (until {day})"));
    }
    if let Some(title) = t.goal_id.as_deref().and_then(|id| goal_title(goals, id)) {
        out.push_str(&format!("  [{title}]"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use current_core::{EnergyRequired, Horizon, Priority, TimeEstimate, WorkType};

    fn goals() -> Vec<Goal> {
        let at = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        vec![
            Goal::new("g-0001", "Grow the bakery", Horizon::Medium, at),
            Goal::new("g-0002", "Run a half marathon", Horizon::Long, at),
        ]
    }

    #[test]
    fn describe_shows_tags_value_and_goal() {
        let t = Task::new("t-0003", "Order flour")
            .with_energy(EnergyRequired::Low)
            .with_work_type(WorkType::Admin)
            .with_time(TimeEstimate::Tiny)
            .with_priority(Priority::MustDo)
            .with_value(80.0)
            .with_goal("g-0001");

        assert_eq!(
            describe(&t, &goals()),
            "t-0003 active    low/admin/tiny/must_do  Order flour  $80  [Grow the bakery]"
        );
    }

    #[test]
    fn resolve_goal_by_title_words() {
        let goals = goals();
        let g = resolve_goal("half marathon", &goals).unwrap();
        assert_eq!(g.id, "g-0002");
        assert!(resolve_goal("learn piano", &goals).is_err());
    }
}
