//! Worker thread for the batch scheduler
//!
//! Each worker pulls tasks from the shared queue until the scheduler closes
//! it, runs them one at a time and reports every outcome on the completion
//! channel.

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::audit::{AuditEvent, AuditLog};
use crate::error::TrimError;
use crate::outcome::Outcome;
use crate::task::{FileTask, TaskRunner};

use super::tracker::ProgressTracker;
use super::types::{Completion, QueuedTask};

/// Worker thread: runs queued file tasks until the queue is closed
pub(crate) fn worker_thread(
    worker_id: usize,
    task_receiver: Receiver<QueuedTask>,
    completion_sender: Sender<Completion>,
    runner: Arc<dyn TaskRunner>,
    audit: Arc<AuditLog>,
    tracker: ProgressTracker,
) {
    debug!("Worker {} started", worker_id);

    for queued in task_receiver.iter() {
        let task = &queued.task;
        audit.record(
            AuditEvent::Attempt,
            &format!(
                "{} -> {}",
                task.source.display(),
                task.primary_output.display()
            ),
        );

        tracker.task_started();
        let outcome = run_isolated(runner.as_ref(), task);
        let finished = tracker.task_finished();

        audit.record_outcome(&outcome);
        info!(
            "Progress: {}/{} files ({} {})",
            finished,
            tracker.total(),
            outcome.file_name(),
            if outcome.is_failed() { "failed" } else { "done" }
        );

        let completion = Completion {
            worker_id,
            seq: queued.seq,
            outcome,
        };
        if completion_sender.send(completion).is_err() {
            // Scheduler is gone, nobody left to report to
            break;
        }
    }

    debug!("Worker {} finished", worker_id);
}

/// Run one task, turning a panic into a failed outcome so the worker survives
fn run_isolated(runner: &dyn TaskRunner, task: &FileTask) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(|| runner.run(task))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("Task for {} panicked: {}", task.source.display(), message);
            Outcome::failed(
                &task.source,
                &TrimError::Stream {
                    path: task.source.clone(),
                    source: io::Error::other(format!("task panicked: {message}")),
                },
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
