//! Type definitions for the batch scheduler
//!
//! Contains the messages passed between the scheduler and its workers.

use crate::outcome::Outcome;
use crate::task::FileTask;

/// A task handed to the worker pool
#[derive(Debug)]
pub(crate) struct QueuedTask {
    /// Submission order, starting at 1
    pub seq: usize,
    pub task: FileTask,
}

/// Sent back by a worker once a task reaches a terminal state
#[derive(Debug)]
pub(crate) struct Completion {
    pub worker_id: usize,
    pub seq: usize,
    pub outcome: Outcome,
}
