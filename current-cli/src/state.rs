use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use current_core::{today_in, CheckIn, Goal, Habit, TaskStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Data home: `$CURRENT_STATE_HOME`, else `~/.current-state`.
pub fn current_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CURRENT_STATE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".current-state"))
}

pub fn ensure_current_home() -> Result<PathBuf> {
    let dir = current_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub created_at_utc: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

pub fn default_timezone() -> String {
    "America/Chicago".to_string()
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_current_home()?.join("profile.json"))
}

pub fn tasks_path() -> Result<PathBuf> {
    Ok(ensure_current_home()?.join("tasks.json"))
}

pub fn goals_path() -> Result<PathBuf> {
    Ok(ensure_current_home()?.join("goals.json"))
}

pub fn habits_path() -> Result<PathBuf> {
    Ok(ensure_current_home()?.join("habits.json"))
}

pub fn checkins_path() -> Result<PathBuf> {
    Ok(ensure_current_home()?.join("checkins.jsonl"))
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    write_json(&profile_path()?, profile)
}

pub fn read_profile() -> Result<Profile> {
    let p = profile_path()?;
    if !p.exists() {
        return Ok(Profile {
            created_at_utc: None,
            name: String::new(),
            timezone: default_timezone(),
        });
    }
    read_json(&p)
}

/// The user's calendar day at `now`, in the profile timezone.
pub fn local_today(now: DateTime<Utc>) -> Result<NaiveDate> {
    let profile = read_profile()?;
    today_in(&profile.timezone, now).context("profile timezone (re-run: current setup)")
}

pub fn load_tasks() -> Result<TaskStore> {
    read_json_or_default(&tasks_path()?)
}

pub fn save_tasks(store: &TaskStore) -> Result<()> {
    write_json(&tasks_path()?, store)
}

pub fn load_goals() -> Result<Vec<Goal>> {
    read_json_or_default(&goals_path()?)
}

pub fn save_goals(goals: &[Goal]) -> Result<()> {
    write_json(&goals_path()?, goals)
}

pub fn load_habits() -> Result<Vec<Habit>> {
    read_json_or_default(&habits_path()?)
}

pub fn save_habits(habits: &[Habit]) -> Result<()> {
    write_json(&habits_path()?, habits)
}

pub fn append_checkin(checkin: &CheckIn) -> Result<()> {
    let p = checkins_path()?;
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&p)
        .with_context(|| format!("open {}", p.display()))?;
    writeln!(f, "{}", serde_json::to_string(checkin)?)?;
    Ok(())
}

/// All recorded check-ins, oldest first. Unreadable lines are skipped.
pub fn read_checkins() -> Result<Vec<CheckIn>> {
    let p = checkins_path()?;
    if !p.exists() {
        return Ok(Vec::new());
    }
    let f = fs::File::open(&p).with_context(|| format!("open {}", p.display()))?;

    let mut out = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<CheckIn>(&line) {
            Ok(c) => out.push(c),
            Err(e) => tracing::warn!(error = %e, "skipping unreadable check-in line"),
        }
    }
    Ok(out)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    read_json(path)
}

/// Writes land in a temp file first, then rename over the target.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("rename to {}", path.display()))?;
    Ok(())
}
