//! Main batch processor
//!
//! Contains the BatchProcessor struct that discovers input files, applies the
//! skip policy and feeds the rest to a fixed pool of workers.

use crossbeam_channel::{bounded, unbounded, Receiver};
use log::{debug, error, info};
use std::ffi::OsStr;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::audit::{AuditEvent, AuditLog};
use crate::config::BatchConfig;
use crate::error::{Result, TrimError};
use crate::layout::{discover_inputs, OutputLayout};
use crate::outcome::{Outcome, RunSummary, SkipReason};
use crate::task::{FileTask, FileTaskRunner, TaskRunner};

use super::tracker::ProgressTracker;
use super::types::{Completion, QueuedTask};
use super::worker::worker_thread;

/// Runs one batch over an input directory
pub struct BatchProcessor {
    config: BatchConfig,
    runner: Arc<dyn TaskRunner>,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Self {
        let runner = Arc::new(FileTaskRunner::new(config.compression_level));
        Self { config, runner }
    }

    /// Replace the task runner, e.g. to instrument or slow down tasks
    pub fn with_runner(mut self, runner: Arc<dyn TaskRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Process every eligible file and wait for all of them.
    ///
    /// Only directory setup errors are returned as `Err`; per-file failures
    /// end up in the summary.
    pub fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();
        let config = &self.config;

        ensure_distinct_dirs(config)?;
        let inputs = discover_inputs(&config.input_dir)?;
        let layout = OutputLayout::new(&config.output_dir, &config.policy);
        layout.prepare()?;
        let audit = Arc::new(AuditLog::open(config.log_path())?);

        let budget = config.workers.get();
        let tracker = ProgressTracker::new(inputs.len());
        let mut summary = RunSummary::new(budget);

        audit.record(
            AuditEvent::Run,
            &format!(
                "start: {} candidate files in {} -> {} (5' = {}, 3' = {}, keep = {}, force = {}, workers = {})",
                inputs.len(),
                config.input_dir.display(),
                config.output_dir.display(),
                config.policy.trim_leading,
                config.policy.trim_trailing,
                config.policy.retain_trimmed,
                config.force,
                budget
            ),
        );

        // Zero capacity: a send completes only once an idle worker takes the task
        let (task_sender, task_receiver) = bounded::<QueuedTask>(0);
        let (completion_sender, completion_receiver) = unbounded::<Completion>();

        let mut worker_handles = Vec::with_capacity(budget);
        for worker_id in 0..budget {
            let task_receiver = task_receiver.clone();
            let completion_sender = completion_sender.clone();
            let runner = Arc::clone(&self.runner);
            let audit = Arc::clone(&audit);
            let tracker = tracker.clone();
            worker_handles.push(thread::spawn(move || {
                worker_thread(
                    worker_id,
                    task_receiver,
                    completion_sender,
                    runner,
                    audit,
                    tracker,
                )
            }));
        }
        drop(task_receiver);
        drop(completion_sender);

        let mut seq = 0;
        for source in inputs {
            let file_name = source.file_name().unwrap_or(OsStr::new(""));
            if !config.force && layout.primary_path(file_name).exists() {
                let outcome = Outcome::skipped(&source, SkipReason::OutputExists);
                audit.record_outcome(&outcome);
                let finished = tracker.file_finished();
                info!(
                    "Output file already exists for {}, skipping ({}/{})",
                    outcome.file_name(),
                    finished,
                    tracker.total()
                );
                summary.record(outcome);
                continue;
            }

            seq += 1;
            let task = FileTask::new(&source, &layout, config.policy);
            info!(
                "Processing: {} (5' = {}, 3' = {})",
                file_name.to_string_lossy(),
                config.policy.trim_leading,
                config.policy.trim_trailing
            );
            if let Err(e) = task_sender.send(QueuedTask { seq, task }) {
                // Every worker has exited; report the task instead of losing it
                let task = e.into_inner().task;
                let outcome = Outcome::failed(
                    &task.source,
                    &TrimError::Stream {
                        path: task.source.clone(),
                        source: io::Error::other("no worker available"),
                    },
                );
                audit.record_outcome(&outcome);
                summary.record(outcome);
                continue;
            }

            drain_ready(&completion_receiver, &mut summary);
        }
        drop(task_sender);

        for completion in completion_receiver.iter() {
            collect(completion, &mut summary);
        }

        for (idx, handle) in worker_handles.into_iter().enumerate() {
            if handle.join().is_err() {
                error!("Worker thread {} panicked", idx);
            }
        }

        summary.peak_workers = tracker.peak_in_flight();
        summary.set_elapsed(start.elapsed());
        audit.record(AuditEvent::Run, &format!("finished: {}", summary.format_table()));

        Ok(summary)
    }
}

fn collect(completion: Completion, summary: &mut RunSummary) {
    debug!(
        "Task {} finished on worker {}",
        completion.seq, completion.worker_id
    );
    summary.record(completion.outcome);
}

/// Collect completions that are already waiting, without blocking
fn drain_ready(receiver: &Receiver<Completion>, summary: &mut RunSummary) {
    while let Ok(completion) = receiver.try_recv() {
        collect(completion, summary);
    }
}

/// Refuse to write outputs over the inputs
fn ensure_distinct_dirs(config: &BatchConfig) -> Result<()> {
    let input = config
        .input_dir
        .canonicalize()
        .map_err(|source| TrimError::Directory {
            path: config.input_dir.clone(),
            source,
        })?;
    if let Ok(output) = config.output_dir.canonicalize() {
        if output == input {
            return Err(TrimError::Directory {
                path: config.output_dir.clone(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "output directory is the input directory",
                ),
            });
        }
    }
    Ok(())
}
