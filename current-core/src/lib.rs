//! current-core: check-in state, tasks, and the state-to-task matcher.

pub mod checkin;
pub mod error;
pub mod goals;
pub mod habits;
pub mod matcher;
pub mod routing;
pub mod state;
pub mod task;
pub mod task_store;
pub mod time;

pub use checkin::CheckIn;
pub use error::StoreError;
pub use goals::{goal_title, next_goal_id, Goal, Horizon};
pub use habits::{next_habit_id, Habit};
pub use matcher::{match_tasks, score_task, RankedMatch, MATCH_LIMIT, MAX_SCORE};
pub use routing::{route_to_goal, RouteConfidence, RouteResult};
pub use state::{EnergyBand, UserState};
pub use task::{EnergyRequired, NewTask, Priority, Task, TaskStatus, TimeEstimate, WorkType};
pub use task_store::TaskStore;
pub use time::{parse_defer_until, today_in};
