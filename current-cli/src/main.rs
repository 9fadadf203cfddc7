use anyhow::Result;
use clap::{Parser, Subcommand};
use current_core::UserState;
use tracing::warn;

use crate::config::Config;

mod checkin_cmd;
mod config;
mod goal_cmd;
mod habit_cmd;
mod logging;
mod setup;
mod state;
mod task_cmd;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CURRENT_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "current",
    version,
    long_version = LONG_VERSION,
    about = "Check in how you feel, get the three tasks that fit"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One-time interactive setup: name and timezone
    Setup,

    /// Record how you are right now and get up to 3 matching tasks
    Checkin {
        /// Physical energy, 1-5
        #[arg(long)]
        energy: i32,

        /// Mental clarity, 1-5
        #[arg(long)]
        clarity: i32,

        /// Emotional state, 1-5
        #[arg(long)]
        emotional: i32,

        /// Available time, 1 (minutes) to 5 (whole afternoon)
        #[arg(long)]
        time: i32,

        /// Environment quality, 1 (noisy, interrupted) to 5 (quiet, focused)
        #[arg(long)]
        environment: i32,

        #[arg(long)]
        note: Option<String>,

        /// Print the matches as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Recent check-ins, newest first
    Checkins {
        /// Number of entries (default from config.checkin.history_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Task management
    Task {
        #[command(subcommand)]
        command: task_cmd::TaskCommand,
    },

    /// Goals tasks can point at
    Goal {
        #[command(subcommand)]
        command: goal_cmd::GoalCommand,
    },

    /// Daily habits and streaks
    Habit {
        #[command(subcommand)]
        command: habit_cmd::HabitCommand,
    },

    /// Local config (~/.current-state/config.toml)
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (cfg, config_err) = match config::load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };
    logging::init_logging(&cfg.logging.level);
    if let Some(e) = config_err {
        if !runs_without_config(&cli.command) {
            return Err(e);
        }
        warn!(error = %format!("{e:#}"), "config unreadable, using defaults");
    }

    match cli.command {
        Command::Setup => setup::run_setup()?,

        Command::Checkin {
            energy,
            clarity,
            emotional,
            time,
            environment,
            note,
            json,
        } => {
            let state = UserState::new(energy, clarity, emotional, time, environment);
            checkin_cmd::checkin(state, note, json, &cfg)?;
        }

        Command::Checkins { limit } => {
            checkin_cmd::history(limit.unwrap_or(cfg.checkin.history_limit))?;
        }

        Command::Task { command } => task_cmd::run(command, &cfg)?,
        Command::Goal { command } => goal_cmd::run(command)?,
        Command::Habit { command } => habit_cmd::run(command)?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

/// Commands a user reaches for to repair a broken config.
fn runs_without_config(command: &Command) -> bool {
    matches!(command, Command::Setup | Command::Config { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_and_config_tolerate_a_broken_config() {
        let cli = Cli::parse_from(["current", "config", "init"]);
        assert!(runs_without_config(&cli.command));

        let cli = Cli::parse_from(["current", "setup"]);
        assert!(runs_without_config(&cli.command));

        let cli = Cli::parse_from(["current", "checkins"]);
        assert!(!runs_without_config(&cli.command));
    }
}
