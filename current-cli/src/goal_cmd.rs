use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use current_core::{next_goal_id, Goal, Horizon};

use crate::state::{load_goals, load_tasks, save_goals};

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    /// Add a goal
    Add {
        title: String,

        /// long, medium or short
        #[arg(long, default_value = "medium")]
        horizon: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// List goals with their open task counts
    List,
}

pub fn run(cmd: GoalCommand) -> Result<()> {
    match cmd {
        GoalCommand::Add {
            title,
            horizon,
            description,
        } => add(&title, &horizon, description),
        GoalCommand::List => list(),
    }
}

fn add(title: &str, horizon: &str, description: Option<String>) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("goal title must not be empty");
    }
    let horizon: Horizon = horizon.parse()?;

    let mut goals = load_goals()?;
    let mut goal = Goal::new(next_goal_id(&goals), title, horizon, Utc::now());
    if let Some(d) = description.filter(|d| !d.trim().is_empty()) {
        goal = goal.with_description(d.trim());
    }
    println!("Added {} {} ({})", goal.id, goal.title, goal.horizon.label());
    goals.push(goal);
    save_goals(&goals)?;
    Ok(())
}

fn list() -> Result<()> {
    let goals = load_goals()?;
    if goals.is_empty() {
        println!("No goals yet. Add one with: current goal add \"<title>\" --horizon long");
        return Ok(());
    }
    let active = load_tasks()?.active_candidates();

    for horizon in [Horizon::Long, Horizon::Medium, Horizon::Short] {
        let group: Vec<&Goal> = goals.iter().filter(|g| g.horizon == horizon).collect();
        if group.is_empty() {
            continue;
        }
        println!("## {}", horizon.label());
        for g in group {
            let open = active
                .iter()
                .filter(|t| t.goal_id.as_deref() == Some(g.id.as_str()))
                .count();
            println!("- {} {} ({} active tasks)", g.id, g.title, open);
            if let Some(d) = &g.description {
                println!("  {d}");
            }
        }
        println!();
    }
    Ok(())
}
