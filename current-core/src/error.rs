//! Error types for task lifecycle operations.

use thiserror::Error;

use crate::task::TaskStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),

    #[error("task {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("{0}")]
    Invalid(String),
}
