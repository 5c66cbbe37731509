//! Batch scheduling for fqtrim
//!
//! Runs file tasks on a fixed pool of worker threads so that at most
//! `WorkerBudget` files are being transformed at any time.
//!
//! # Module Structure
//!
//! - `types`: Messages between the scheduler and workers
//! - `tracker`: Atomic progress counters
//! - `worker`: Worker thread running file tasks
//! - `processor`: Main BatchProcessor orchestration

mod processor;
mod tracker;
mod types;
mod worker;

// Re-export public types
pub use processor::BatchProcessor;
pub use tracker::ProgressTracker;
