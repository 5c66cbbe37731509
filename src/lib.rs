// Core library for fqtrim batch FASTQ trimming

pub mod audit;
pub mod cli;
pub mod config;
pub mod config_file;
pub mod decompression;
pub mod error;
pub mod layout;
pub mod outcome;
pub mod parallel;
pub mod platform;
pub mod task;
pub mod transform;

pub use config::{BatchConfig, TrimPolicy, WorkerBudget};
pub use error::{Result, TrimError};
pub use outcome::{Outcome, OutcomeKind, RunSummary};
pub use parallel::BatchProcessor;

use std::path::Path;

/// Trim every eligible file in `input_dir` into `output_dir` using one worker
/// per CPU. Existing outputs are skipped unless `force` is set.
pub fn run_batch<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    policy: TrimPolicy,
    force: bool,
) -> Result<RunSummary> {
    let config = BatchConfig::new(input_dir, output_dir, policy).with_force(force);
    BatchProcessor::new(config).run()
}
