use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use current_core::{next_habit_id, Habit};

use crate::state::{load_habits, local_today, save_habits};

#[derive(Subcommand, Debug)]
pub enum HabitCommand {
    /// Start tracking a habit
    Add { name: String },

    /// Mark a habit done (today unless --date)
    Done {
        /// Habit id or name
        habit: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },

    /// Habits with current and longest streaks
    List,
}

pub fn run(cmd: HabitCommand) -> Result<()> {
    match cmd {
        HabitCommand::Add { name } => add(&name),
        HabitCommand::Done { habit, date } => done(&habit, date.as_deref()),
        HabitCommand::List => list(),
    }
}

fn add(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("habit name must not be empty");
    }
    let mut habits = load_habits()?;
    if find(&habits, name).is_some() {
        bail!("habit '{name}' already exists");
    }
    let habit = Habit::new(next_habit_id(&habits), name, Utc::now());
    println!("Added {} {}", habit.id, habit.name);
    habits.push(habit);
    save_habits(&habits)
}

fn find(habits: &[Habit], key: &str) -> Option<usize> {
    let key = key.trim();
    habits
        .iter()
        .position(|h| h.id == key || h.name.eq_ignore_ascii_case(key))
}

fn done(key: &str, date: Option<&str>) -> Result<()> {
    let today = local_today(Utc::now())?;
    let day = match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}' (use YYYY-MM-DD)"))?,
        None => today,
    };
    if day > today {
        bail!("cannot mark {day} done: it is in the future");
    }

    let mut habits = load_habits()?;
    let idx = find(&habits, key).ok_or_else(|| anyhow!("no habit '{key}' (see: current habit list)"))?;
    let habit = &mut habits[idx];

    if habit.mark_done(day) {
        println!(
            "{} done for {day}. Streak: {}",
            habit.name,
            habit.current_streak(today)
        );
    } else {
        println!("{} was already done on {day}", habit.name);
    }
    save_habits(&habits)
}

fn list() -> Result<()> {
    let habits = load_habits()?;
    if habits.is_empty() {
        println!("No habits yet. Add one with: current habit add \"<name>\"");
        return Ok(());
    }
    let today = local_today(Utc::now())?;
    for h in &habits {
        println!("{}", streak_line(h, today));
    }
    Ok(())
}

fn streak_line(h: &Habit, today: NaiveDate) -> String {
    let mark = if h.completed_on(today) { "x" } else { " " };
    format!(
        "[{mark}] {} {}  streak {} (best {}), {}/7 this week",
        h.id,
        h.name,
        h.current_streak(today),
        h.longest_streak(),
        h.completions_in_window(today, 7)
    )
}
