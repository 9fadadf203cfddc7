use anyhow::Result;
use chrono::Utc;
use current_core::{goal_title, match_tasks, CheckIn, Goal, RankedMatch, UserState, MAX_SCORE};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::state::{
    append_checkin, load_goals, load_tasks, local_today, read_checkins, save_tasks,
};

#[derive(Serialize)]
struct CheckinOutput<'a> {
    composite: f64,
    band: &'static str,
    reactivated: &'a [String],
    matches: &'a [RankedMatch<'a>],
}

pub fn checkin(state: UserState, note: Option<String>, json: bool, cfg: &Config) -> Result<()> {
    state.validate()?;

    let now = Utc::now();
    let today = local_today(now)?;

    let mut store = load_tasks()?;
    let reactivated = store.reactivate_due(today);
    if !reactivated.is_empty() {
        save_tasks(&store)?;
    }

    let candidates = store.active_candidates();
    let matches = match_tasks(&candidates, &state);
    info!(
        candidates = candidates.len(),
        matched = matches.len(),
        composite = state.composite_score(),
        "check-in matched"
    );

    let mut record = CheckIn::new(state, now).with_recommendations(&matches);
    if let Some(note) = note {
        record = record.with_note(note);
    }
    append_checkin(&record)?;

    if json {
        let out = CheckinOutput {
            composite: state.composite_score(),
            band: state.energy_band().label(),
            reactivated: &reactivated,
            matches: &matches,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let goals = load_goals()?;
    println!(
        "Composite {:.1} ({} energy)\n",
        state.composite_score(),
        state.energy_band().label()
    );
    if !reactivated.is_empty() {
        println!("Back from deferral: {}\n", reactivated.join(", "));
    }
    if matches.is_empty() {
        println!("No active tasks. Add one with: current task add \"<title>\"");
        return Ok(());
    }
    for (i, m) in matches.iter().enumerate() {
        print!("{}", render_match(i + 1, m, &goals, cfg.checkin.show_scores));
    }
    Ok(())
}

fn render_match(rank: usize, m: &RankedMatch<'_>, goals: &[Goal], show_scores: bool) -> String {
    let mut out = format!("{rank}. {} [{}]", m.task.title, m.task.id);
    if show_scores {
        out.push_str(&format!("  {}/{}", m.score, MAX_SCORE));
    }
    out.push('\n');

    for reason in &m.reasons {
        out.push_str(&format!("   - {reason}\n"));
    }
    if let Some(title) = m.task.goal_id.as_deref().and_then(|id| goal_title(goals, id)) {
        out.push_str(&format!("   goal: {title}\n"));
    }
    out
}

pub fn history(limit: usize) -> Result<()> {
    let checkins = read_checkins()?;
    if checkins.is_empty() {
        println!("No check-ins yet. Run: current checkin --help");
        return Ok(());
    }
    for c in checkins.iter().rev().take(limit) {
        println!("{}", render_checkin(c));
    }
    Ok(())
}

fn render_checkin(c: &CheckIn) -> String {
    let s = &c.state;
    let mut line = format!(
        "{}  {:.1} {:<4}  E{} C{} Em{} T{} Env{}",
        c.recorded_at.format("%Y-%m-%d %H:%M UTC"),
        c.composite_score(),
        c.state.energy_band().label(),
        s.energy_level,
        s.mental_clarity,
        s.emotional_state,
        s.available_time,
        s.environment_quality
    );
    if !c.recommended.is_empty() {
        line.push_str(&format!("  -> {}", c.recommended.join(", ")));
    }
    if let Some(note) = &c.note {
        line.push_str(&format!("  \"{note}\""));
    }
    line
}
