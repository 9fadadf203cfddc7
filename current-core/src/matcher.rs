//! State-to-task matcher.
//!
//! Scores every candidate task against a check-in and returns the best few
//! with the reasons that earned them points. Pure: no I/O, no clock, no
//! shared state. Same inputs, same output.
//!
//! Score is the sum of six independent rules, each evaluated for every task:
//! - energy band fit (max 40)
//! - time fit (max 25)
//! - environment / work-type synergy (max 15)
//! - priority (max 10)
//! - acceptance history (10)
//! - monetary value (5)
//!
//! Scores are not normalized; the ceiling is 105.

use serde::Serialize;

use crate::state::{EnergyBand, UserState};
use crate::task::{EnergyRequired, Priority, Task, WorkType};

/// Number of recommendations returned per check-in.
pub const MATCH_LIMIT: usize = 3;

/// Highest score any task can reach.
pub const MAX_SCORE: u32 = 40 + 25 + 15 + 10 + 10 + 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch<'a> {
    pub task: &'a Task,
    pub score: u32,
    /// One entry per rule that fired with explanatory text, in rule order.
    pub reasons: Vec<String>,
}

/// Points from a single rule, optionally explained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Contribution {
    points: u32,
    reason: Option<String>,
}

impl Contribution {
    fn silent(points: u32) -> Self {
        Self {
            points,
            reason: None,
        }
    }

    fn explained(points: u32, reason: impl Into<String>) -> Self {
        Self {
            points,
            reason: Some(reason.into()),
        }
    }
}

/// Rank `tasks` against `state`, returning at most [`MATCH_LIMIT`] matches.
///
/// Ties keep their input order.
pub fn match_tasks<'a>(tasks: &'a [Task], state: &UserState) -> Vec<RankedMatch<'a>> {
    let mut ranked: Vec<RankedMatch<'a>> = tasks.iter().map(|t| score_task(t, state)).collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(MATCH_LIMIT);
    ranked
}

/// Score a single task without ranking.
pub fn score_task<'a>(task: &'a Task, state: &UserState) -> RankedMatch<'a> {
    let contributions = [
        energy_fit(task, state),
        time_fit(task, state),
        environment_synergy(task, state),
        priority_weight(task),
        acceptance_bias(task),
        value_bonus(task),
    ];

    let mut score = 0;
    let mut reasons = Vec::new();
    for c in contributions {
        score += c.points;
        if let Some(reason) = c.reason {
            reasons.push(reason);
        }
    }

    RankedMatch {
        task,
        score,
        reasons,
    }
}

/// Energy band (from the composite of all five dimensions) vs. the task's
/// energy requirement.
fn energy_fit(task: &Task, state: &UserState) -> Contribution {
    match (state.energy_band(), task.energy_required) {
        (EnergyBand::Low, EnergyRequired::Low) => {
            Contribution::explained(40, "Perfect for your current energy level")
        }
        (EnergyBand::Low, EnergyRequired::Medium) => Contribution::silent(15),

        (EnergyBand::Mid, EnergyRequired::Medium) => {
            Contribution::explained(40, "Matches your current capacity")
        }
        (EnergyBand::Mid, EnergyRequired::Low) => Contribution::silent(25),
        (EnergyBand::Mid, EnergyRequired::High) => Contribution::silent(15),

        (EnergyBand::High, EnergyRequired::High) => {
            Contribution::explained(40, "Great time for challenging work")
        }
        (EnergyBand::High, EnergyRequired::Medium) => Contribution::silent(25),

        _ => Contribution::default(),
    }
}

/// Raw `available_time` (not the composite) vs. the task's time ordinal.
/// First matching branch wins.
fn time_fit(task: &Task, state: &UserState) -> Contribution {
    let available = state.available_time;
    let needed = task.time_estimate.ordinal();

    if available <= 2 && needed <= 2 {
        Contribution::explained(25, "Fits your available time")
    } else if available >= 4 && needed >= 3 {
        Contribution::explained(20, "Good use of your time block")
    } else if available.abs_diff(needed) <= 1 {
        Contribution::silent(15)
    } else {
        Contribution::default()
    }
}

fn environment_synergy(task: &Task, state: &UserState) -> Contribution {
    let env = state.environment_quality;
    match task.work_type {
        WorkType::DeepWork if env >= 4 => {
            Contribution::explained(15, "Perfect environment for focus work")
        }
        WorkType::Admin if env <= 2 => {
            Contribution::explained(15, "Good for a distracting environment")
        }
        _ => Contribution::default(),
    }
}

fn priority_weight(task: &Task) -> Contribution {
    match task.priority {
        Priority::MustDo => Contribution::explained(10, "High priority task"),
        Priority::ShouldDo => Contribution::silent(5),
        _ => Contribution::default(),
    }
}

fn acceptance_bias(task: &Task) -> Contribution {
    if task.times_accepted > task.times_declined {
        Contribution::silent(10)
    } else {
        Contribution::default()
    }
}

fn value_bonus(task: &Task) -> Contribution {
    match task.estimated_value {
        Some(value) if value > 0.0 => Contribution::explained(5, format!("Worth ${value}")),
        _ => Contribution::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TimeEstimate;

    fn task(id: &str) -> Task {
        Task::new(id, format!("task {id}"))
    }

    fn ids<'a>(matches: &[RankedMatch<'a>]) -> Vec<&'a str> {
        matches.iter().map(|m| m.task.id.as_str()).collect()
    }

    #[test]
    fn test_scenario_all_max_state_challenging_task() {
        let state = UserState::uniform(5);
        let t = task("a")
            .with_energy(EnergyRequired::High)
            .with_time(TimeEstimate::Extended)
            .with_work_type(WorkType::DeepWork)
            .with_priority(Priority::MustDo)
            .with_value(500.0)
            .with_history(3, 1);

        let m = score_task(&t, &state);
        assert_eq!(m.score, 100);
        assert_eq!(
            m.reasons,
            vec![
                "Great time for challenging work",
                "Good use of your time block",
                "Perfect environment for focus work",
                "High priority task",
                "Worth $500",
            ]
        );
    }

    #[test]
    fn test_scenario_all_min_state_tiny_admin_task() {
        let state = UserState::uniform(1);
        let t = task("b")
            .with_energy(EnergyRequired::Low)
            .with_time(TimeEstimate::Tiny)
            .with_work_type(WorkType::Admin)
            .with_priority(Priority::Someday);

        let m = score_task(&t, &state);
        assert_eq!(m.score, 80);
        assert_eq!(
            m.reasons,
            vec![
                "Perfect for your current energy level",
                "Fits your available time",
                "Good for a distracting environment",
            ]
        );
    }

    #[test]
    fn test_empty_task_list_yields_no_matches() {
        assert!(match_tasks(&[], &UserState::uniform(3)).is_empty());
    }

    /// Under an all-5 state these score 90, 80, 70, 60, 50.
    fn graded_tasks() -> Vec<Task> {
        vec![
            task("s90")
                .with_energy(EnergyRequired::High)
                .with_work_type(WorkType::DeepWork)
                .with_priority(Priority::MustDo)
                .with_value(10.0),
            task("s80")
                .with_energy(EnergyRequired::High)
                .with_work_type(WorkType::DeepWork)
                .with_priority(Priority::ShouldDo),
            task("s70")
                .with_energy(EnergyRequired::High)
                .with_work_type(WorkType::Admin)
                .with_priority(Priority::MustDo),
            task("s60")
                .with_energy(EnergyRequired::High)
                .with_work_type(WorkType::Admin)
                .with_priority(Priority::Someday),
            task("s50")
                .with_energy(EnergyRequired::Medium)
                .with_work_type(WorkType::Admin)
                .with_priority(Priority::ShouldDo),
        ]
    }

    #[test]
    fn test_top_three_of_distinct_scores() {
        let state = UserState::uniform(5);
        let tasks = graded_tasks();

        let scores: Vec<u32> = tasks.iter().map(|t| score_task(t, &state).score).collect();
        assert_eq!(scores, vec![90, 80, 70, 60, 50]);

        let matches = match_tasks(&tasks, &state);
        assert_eq!(ids(&matches), vec!["s90", "s80", "s70"]);
    }

    #[test]
    fn test_top_three_regardless_of_input_order() {
        let state = UserState::uniform(5);
        let mut tasks = graded_tasks();
        tasks.reverse();

        let matches = match_tasks(&tasks, &state);
        assert_eq!(ids(&matches), vec!["s90", "s80", "s70"]);
        assert_eq!(
            matches.iter().map(|m| m.score).collect::<Vec<_>>(),
            vec![90, 80, 70]
        );
    }

    #[test]
    fn test_short_lists_are_returned_whole_and_sorted() {
        let state = UserState::uniform(5);
        let tasks = vec![
            task("low").with_energy(EnergyRequired::Low),
            task("high").with_energy(EnergyRequired::High),
        ];

        let matches = match_tasks(&tasks, &state);
        assert_eq!(ids(&matches), vec!["high", "low"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let state = UserState::uniform(3);
        let tasks = vec![task("first"), task("second"), task("third"), task("fourth")];

        let matches = match_tasks(&tasks, &state);
        assert_eq!(ids(&matches), vec!["first", "second", "third"]);
        assert!(matches.iter().all(|m| m.score == matches[0].score));
    }

    #[test]
    fn test_matching_is_repeatable() {
        let state = UserState::new(4, 2, 3, 5, 1);
        let tasks = graded_tasks();
        assert_eq!(match_tasks(&tasks, &state), match_tasks(&tasks, &state));
    }

    #[test]
    fn test_matching_leaves_tasks_untouched() {
        let state = UserState::uniform(5);
        let tasks = graded_tasks();
        let before = tasks.clone();
        let _ = match_tasks(&tasks, &state);
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_energy_payoff_tables() {
        let cases = [
            (1, EnergyRequired::Low, 40),
            (1, EnergyRequired::Medium, 15),
            (1, EnergyRequired::High, 0),
            (3, EnergyRequired::Low, 25),
            (3, EnergyRequired::Medium, 40),
            (3, EnergyRequired::High, 15),
            (5, EnergyRequired::Low, 0),
            (5, EnergyRequired::Medium, 25),
            (5, EnergyRequired::High, 40),
            (3, EnergyRequired::Unknown, 0),
        ];
        for (level, energy, expected) in cases {
            let t = task("e").with_energy(energy);
            let c = energy_fit(&t, &UserState::uniform(level));
            assert_eq!(c.points, expected, "level {level} energy {energy}");
        }
    }

    #[test]
    fn test_only_exact_band_matches_are_explained() {
        let t = task("e").with_energy(EnergyRequired::Medium);
        assert_eq!(
            energy_fit(&t, &UserState::uniform(3)).reason.as_deref(),
            Some("Matches your current capacity")
        );
        assert_eq!(energy_fit(&t, &UserState::uniform(5)).reason, None);
    }

    #[test]
    fn test_time_fit_uses_raw_available_time() {
        // Composite is high (4.2) but available time alone is short.
        let state = UserState::new(5, 5, 5, 1, 5);
        let t = task("t").with_time(TimeEstimate::Short);
        let c = time_fit(&t, &state);
        assert_eq!(c.points, 25);
        assert_eq!(c.reason.as_deref(), Some("Fits your available time"));
    }

    #[test]
    fn test_time_fit_branches() {
        let at = |available: i32, time: TimeEstimate| {
            let state = UserState::new(3, 3, 3, available, 3);
            time_fit(&task("t").with_time(time), &state)
        };

        assert_eq!(at(2, TimeEstimate::Tiny).points, 25);
        assert_eq!(at(4, TimeEstimate::Medium).points, 20);
        assert_eq!(
            at(4, TimeEstimate::Medium).reason.as_deref(),
            Some("Good use of your time block")
        );

        // Near miss: silent 15.
        let near = at(3, TimeEstimate::Long);
        assert_eq!(near.points, 15);
        assert_eq!(near.reason, None);
        assert_eq!(at(2, TimeEstimate::Medium).points, 15);
        assert_eq!(at(3, TimeEstimate::Short).points, 15);

        // Plenty of time but a short task: too far apart for the near-miss branch.
        assert_eq!(at(4, TimeEstimate::Short).points, 0);
        assert_eq!(at(1, TimeEstimate::Extended).points, 0);
        assert_eq!(at(5, TimeEstimate::Tiny).points, 0);

        // Unknown estimates count as medium.
        assert_eq!(at(4, TimeEstimate::Unknown).points, 20);
    }

    #[test]
    fn test_environment_synergy() {
        let deep = task("d").with_work_type(WorkType::DeepWork);
        let admin = task("a").with_work_type(WorkType::Admin);
        let creative = task("c").with_work_type(WorkType::Creative);

        let calm = UserState::new(3, 3, 3, 3, 4);
        let noisy = UserState::new(3, 3, 3, 3, 2);

        assert_eq!(environment_synergy(&deep, &calm).points, 15);
        assert_eq!(environment_synergy(&deep, &noisy).points, 0);
        assert_eq!(environment_synergy(&admin, &noisy).points, 15);
        assert_eq!(environment_synergy(&admin, &calm).points, 0);
        assert_eq!(environment_synergy(&creative, &calm).points, 0);
        assert_eq!(environment_synergy(&creative, &noisy).points, 0);
    }

    #[test]
    fn test_priority_and_history() {
        assert_eq!(priority_weight(&task("p").with_priority(Priority::MustDo)).points, 10);
        let should = priority_weight(&task("p").with_priority(Priority::ShouldDo));
        assert_eq!(should.points, 5);
        assert_eq!(should.reason, None);
        assert_eq!(priority_weight(&task("p").with_priority(Priority::CouldDo)).points, 0);
        assert_eq!(priority_weight(&task("p").with_priority(Priority::Unknown)).points, 0);

        assert_eq!(acceptance_bias(&task("h").with_history(2, 1)).points, 10);
        assert_eq!(acceptance_bias(&task("h").with_history(1, 1)).points, 0);
        assert_eq!(acceptance_bias(&task("h").with_history(0, 4)).points, 0);
    }

    #[test]
    fn test_value_reason_uses_plain_display() {
        let c = value_bonus(&task("v").with_value(12.5));
        assert_eq!(c.points, 5);
        assert_eq!(c.reason.as_deref(), Some("Worth $12.5"));

        assert_eq!(value_bonus(&task("v").with_value(0.0)).points, 0);
        assert_eq!(value_bonus(&task("v")).points, 0);
    }

    #[test]
    fn test_silent_only_task_has_no_reasons() {
        // Mid band + high energy (15), near time miss (15), should-do (5), history (10).
        let state = UserState::uniform(3);
        let t = task("quiet")
            .with_energy(EnergyRequired::High)
            .with_time(TimeEstimate::Long)
            .with_work_type(WorkType::Creative)
            .with_priority(Priority::ShouldDo)
            .with_history(1, 0);

        let m = score_task(&t, &state);
        assert_eq!(m.score, 45);
        assert!(m.reasons.is_empty());
    }

    #[test]
    fn test_scores_stay_within_bounds() {
        let energies = [EnergyRequired::Low, EnergyRequired::Medium, EnergyRequired::High];
        let times = [TimeEstimate::Tiny, TimeEstimate::Medium, TimeEstimate::Extended];
        let works = [WorkType::DeepWork, WorkType::Admin, WorkType::Learning];
        let states = [
            UserState::uniform(1),
            UserState::uniform(3),
            UserState::uniform(5),
            UserState::new(5, 5, 5, 1, 1),
            UserState::new(1, 1, 1, 5, 5),
        ];

        for state in &states {
            for energy in energies {
                for time in times {
                    for work in works {
                        let t = task("x")
                            .with_energy(energy)
                            .with_time(time)
                            .with_work_type(work)
                            .with_priority(Priority::MustDo)
                            .with_value(1.0)
                            .with_history(1, 0);
                        let score = score_task(&t, state).score;
                        assert!(score <= MAX_SCORE, "score {score} exceeds {MAX_SCORE}");
                    }
                }
            }
        }
        assert_eq!(MAX_SCORE, 105);
    }
}
