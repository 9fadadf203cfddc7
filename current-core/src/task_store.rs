//! TaskStore: insertion-ordered task collection with lifecycle transitions.
//!
//! The store is what the matcher's candidates come from and what user actions
//! on a recommendation write back to:
//! - complete: active -> completed, bumps `times_accepted`
//! - defer: active -> deferred until a local day, bumps `times_declined`
//! - archive: active | deferred -> archived
//! - deferred tasks come back to active once their day arrives
//!
//! Insertion order is preserved because the matcher breaks ties by input order.
//! Persistence is the caller's job; the store is plain serde data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::task::{NewTask, Task, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStore {
    /// Last id sequence handed out. Never reused, even after archive.
    #[serde(default)]
    seq: u32,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, new: NewTask, now: DateTime<Utc>) -> Result<&Task, StoreError> {
        new.validate()
            .map_err(|e| StoreError::Invalid(e.to_string()))?;

        self.seq += 1;
        let id = format!("t-{:04}", self.seq);
        debug!(task_id = %id, title = %new.title, "task added");

        self.tasks.push(Task::from_new(id, new, now));
        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    /// Tasks eligible for matching, in insertion order.
    pub fn active_candidates(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Active)
            .cloned()
            .collect()
    }

    /// Bring deferred tasks whose day has arrived back to active.
    /// Returns the ids that moved.
    pub fn reactivate_due(&mut self, today: NaiveDate) -> Vec<String> {
        let mut moved = Vec::new();
        for t in self.tasks.iter_mut() {
            if t.status != TaskStatus::Deferred {
                continue;
            }
            // A deferred task without a day is due immediately.
            let due = t.deferred_until.map(|d| d <= today).unwrap_or(true);
            if due {
                t.status = TaskStatus::Active;
                t.deferred_until = None;
                moved.push(t.id.clone());
            }
        }
        if !moved.is_empty() {
            debug!(count = moved.len(), %today, "deferred tasks reactivated");
        }
        moved
    }

    /// The user did a recommended task.
    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<&Task, StoreError> {
        let t = self.transition(id, &[TaskStatus::Active], TaskStatus::Completed)?;
        t.times_accepted += 1;
        t.completed_at = Some(now);
        debug!(task_id = %id, accepted = t.times_accepted, "task completed");
        Ok(&*t)
    }

    /// The user pushed a recommended task to a later day.
    pub fn defer(&mut self, id: &str, until: NaiveDate) -> Result<&Task, StoreError> {
        let t = self.transition(id, &[TaskStatus::Active], TaskStatus::Deferred)?;
        t.times_declined += 1;
        t.deferred_until = Some(until);
        debug!(task_id = %id, %until, declined = t.times_declined, "task deferred");
        Ok(&*t)
    }

    pub fn archive(&mut self, id: &str) -> Result<&Task, StoreError> {
        let t = self.transition(
            id,
            &[TaskStatus::Active, TaskStatus::Deferred],
            TaskStatus::Archived,
        )?;
        t.deferred_until = None;
        debug!(task_id = %id, "task archived");
        Ok(&*t)
    }

    fn transition(
        &mut self,
        id: &str,
        allowed_from: &[TaskStatus],
        to: TaskStatus,
    ) -> Result<&mut Task, StoreError> {
        let t = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if !allowed_from.contains(&t.status) {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from: t.status,
                to,
            });
        }

        t.status = to;
        Ok(t)
    }
}
