use anyhow::{bail, Result};
use std::io::{self, Write};

use crate::state::{default_timezone, profile_path, read_profile, write_profile, Profile};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn run_setup() -> Result<()> {
    println!("Current State setup\n");
    let existing = read_profile()?;

    let name = prompt("Your name (optional)")?;

    let tz_default = if existing.timezone.is_empty() {
        default_timezone()
    } else {
        existing.timezone.clone()
    };
    let tz_input = prompt(&format!("Timezone (IANA, default {tz_default})"))?;
    let timezone = if tz_input.is_empty() { tz_default } else { tz_input };

    if timezone.parse::<chrono_tz::Tz>().is_err() {
        bail!("invalid timezone: {timezone} (use IANA format like America/Chicago)");
    }

    let profile = Profile {
        created_at_utc: existing
            .created_at_utc
            .or_else(|| Some(chrono::Utc::now().to_rfc3339())),
        name,
        timezone,
    };
    write_profile(&profile)?;
    tracing::info!(timezone = %profile.timezone, "profile written");

    println!("\nWrote:");
    println!("- {}", profile_path()?.display());

    println!("\nNext recommended steps:");
    println!("- current goal add \"Run a half marathon\" --horizon long");
    println!("- current task add \"Draft quarterly report\" --energy high --work-type deep_work");
    println!("- current checkin --energy 3 --clarity 4 --emotional 3 --time 2 --environment 4");

    Ok(())
}
