//! Time utilities: the user's local day and defer-date parsing.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;

static DAY_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+(\d{1,3})\s*d?$").expect("day offset pattern is valid")
});

/// The calendar day it is for a user in IANA timezone `tz` at `now`.
pub fn today_in(tz: &str, now: DateTime<Utc>) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow!("invalid timezone: {tz}"))?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Parse when a deferred task should come back.
///
/// Accepts `YYYY-MM-DD`, `tomorrow`, `next-week`, or a day offset like `+3`
/// / `+3d`. The day must be after `today`.
pub fn parse_defer_until(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = input.trim().to_lowercase();

    let day = match s.as_str() {
        "tomorrow" => today + Duration::days(1),
        "next-week" | "next week" => today + Duration::days(7),
        _ => {
            if let Some(caps) = DAY_OFFSET.captures(&s) {
                let days: i64 = caps[1].parse()?;
                today + Duration::days(days)
            } else {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
                    anyhow!("invalid defer date '{input}': {e} (use YYYY-MM-DD, tomorrow, next-week or +N)")
                })?
            }
        }
    };

    if day <= today {
        bail!("defer date {day} must be after today ({today})");
    }
    Ok(day)
}
