//! Per-file task execution
//!
//! A [`FileTask`] is built once per input file and consumed by exactly one
//! [`TaskRunner::run`] call. Every handle the runner opens is owned by a local
//! and closed on drop, so early returns release them too.

use log::{debug, warn};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::{TrimPolicy, DEFAULT_COMPRESSION_LEVEL};
use crate::decompression::{Compression, InputReader, OutputWriter};
use crate::error::{Result, TrimError};
use crate::layout::OutputLayout;
use crate::outcome::Outcome;
use crate::transform::{RecordTrimmer, SideSink, TransformStats, TrimEnd};

/// Side output destination for one trimmed end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideOutput {
    pub end: TrimEnd,
    pub path: PathBuf,
}

/// Everything needed to transform one input file
#[derive(Debug, Clone)]
pub struct FileTask {
    pub source: PathBuf,
    pub primary_output: PathBuf,
    pub side_outputs: Vec<SideOutput>,
    pub policy: TrimPolicy,
}

impl FileTask {
    /// Build a task for `source`, placing its outputs according to `layout`
    pub fn new(source: &Path, layout: &OutputLayout, policy: TrimPolicy) -> Self {
        let file_name = source.file_name().unwrap_or(OsStr::new(""));
        let side_outputs = layout
            .side_ends()
            .iter()
            .map(|&end| SideOutput {
                end,
                path: layout.side_path(end, file_name),
            })
            .collect();

        Self {
            source: source.to_path_buf(),
            primary_output: layout.primary_path(file_name),
            side_outputs,
            policy,
        }
    }

    pub fn side_output(&self, end: TrimEnd) -> Option<&Path> {
        self.side_outputs
            .iter()
            .find(|side| side.end == end)
            .map(|side| side.path.as_path())
    }
}

/// Executes file tasks. Implementations must be shareable across workers.
pub trait TaskRunner: Send + Sync {
    fn run(&self, task: &FileTask) -> Outcome;
}

/// Runs the trim transform over real files
#[derive(Debug, Clone)]
pub struct FileTaskRunner {
    compression_level: u32,
}

impl Default for FileTaskRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl FileTaskRunner {
    pub fn new(compression_level: u32) -> Self {
        Self { compression_level }
    }

    fn execute(&self, task: &FileTask) -> Result<(Compression, TransformStats)> {
        let stream_error = |source: std::io::Error| TrimError::Stream {
            path: task.source.clone(),
            source,
        };

        let mut reader = InputReader::open(&task.source).map_err(|source| TrimError::SourceOpen {
            path: task.source.clone(),
            source,
        })?;
        let compression = reader.compression();
        debug!("{}: detected {} input", task.source.display(), compression);

        let open_output = |path: &Path| {
            OutputWriter::create(path, compression, self.compression_level).map_err(|source| {
                TrimError::DestinationOpen {
                    path: path.to_path_buf(),
                    source,
                }
            })
        };

        // Primary last: its existence marks the file as done for later runs
        let mut sides = Vec::with_capacity(task.side_outputs.len());
        for side in &task.side_outputs {
            sides.push(SideSink::new(side.end, open_output(&side.path)?));
        }
        let mut primary = open_output(&task.primary_output)?;

        let stats = RecordTrimmer::new(task.policy)
            .trim(&mut reader, &mut primary, &mut sides)
            .map_err(stream_error)?;

        primary.finish().map_err(stream_error)?;
        for side in sides {
            side.writer.finish().map_err(stream_error)?;
        }

        Ok((compression, stats))
    }
}

impl TaskRunner for FileTaskRunner {
    fn run(&self, task: &FileTask) -> Outcome {
        debug!(
            "Trimming {} -> {}",
            task.source.display(),
            task.primary_output.display()
        );
        match self.execute(task) {
            Ok((compression, stats)) => Outcome::processed(&task.source, compression, stats),
            Err(e) => {
                warn!("{}", e);
                Outcome::failed(&task.source, &e)
            }
        }
    }
}
