//! Habits and streak counting over local completion days.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Local days the habit was done. One entry per day at most.
    #[serde(default)]
    pub completions: BTreeSet<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            completions: BTreeSet::new(),
            created_at,
        }
    }

    /// Record the habit as done on `day`. Returns false if it already was.
    pub fn mark_done(&mut self, day: NaiveDate) -> bool {
        self.completions.insert(day)
    }

    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.completions.contains(&day)
    }

    /// Consecutive days up to today. If today isn't done yet the streak is
    /// still alive as long as yesterday was.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let yesterday = today - Duration::days(1);
        let mut day = if self.completed_on(today) {
            today
        } else if self.completed_on(yesterday) {
            yesterday
        } else {
            return 0;
        };

        let mut streak = 0;
        while self.completed_on(day) {
            streak += 1;
            day -= Duration::days(1);
        }
        streak
    }

    pub fn longest_streak(&self) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        let mut prev: Option<NaiveDate> = None;

        for &day in &self.completions {
            run = match prev {
                Some(p) if p.succ_opt() == Some(day) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            prev = Some(day);
        }
        longest
    }

    /// Days done within the `window` days ending at `today` (inclusive).
    pub fn completions_in_window(&self, today: NaiveDate, window: u32) -> usize {
        if window == 0 {
            return 0;
        }
        let start = today - Duration::days(i64::from(window) - 1);
        self.completions.range(start..=today).count()
    }
}

/// Next free id of the form `h-0001`.
pub fn next_habit_id(habits: &[Habit]) -> String {
    let max = habits
        .iter()
        .filter_map(|h| h.id.strip_prefix("h-"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("h-{:04}", max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn habit_done_on(days: &[u32]) -> Habit {
        let mut h = Habit::new(
            "h-0001",
            "Stretch",
            Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap(),
        );
        for d in days {
            h.mark_done(day(*d));
        }
        h
    }

    #[test]
    fn test_mark_done_is_idempotent() {
        let mut h = habit_done_on(&[]);
        assert!(h.mark_done(day(3)));
        assert!(!h.mark_done(day(3)));
        assert_eq!(h.completions.len(), 1);
    }

    #[test]
    fn test_current_streak_counts_back_from_today() {
        let h = habit_done_on(&[1, 3, 4, 5]);
        assert_eq!(h.current_streak(day(5)), 3);
    }

    #[test]
    fn test_current_streak_survives_until_today_is_done() {
        let h = habit_done_on(&[3, 4, 5]);
        assert_eq!(h.current_streak(day(6)), 3);
        // Two days missed: streak is gone.
        assert_eq!(h.current_streak(day(7)), 0);
    }

    #[test]
    fn test_longest_streak() {
        let h = habit_done_on(&[1, 2, 3, 7, 8, 10]);
        assert_eq!(h.longest_streak(), 3);
        assert_eq!(habit_done_on(&[]).longest_streak(), 0);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let mut h = habit_done_on(&[1, 2]);
        h.mark_done(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        assert_eq!(h.current_streak(day(2)), 3);
        assert_eq!(h.longest_streak(), 3);
    }

    #[test]
    fn test_completions_in_window() {
        let h = habit_done_on(&[1, 4, 6, 7]);
        assert_eq!(h.completions_in_window(day(7), 7), 4);
        assert_eq!(h.completions_in_window(day(7), 3), 2);
        assert_eq!(h.completions_in_window(day(7), 0), 0);
    }

    #[test]
    fn test_next_habit_id() {
        assert_eq!(next_habit_id(&[]), "h-0001");
        assert_eq!(next_habit_id(&[habit_done_on(&[])]), "h-0002");
    }
}
