use std::path::{Path, PathBuf};

use crate::cli::{Cli, SummaryFormat};
use crate::config_file::ConfigFile;
use crate::error::{Result, TrimError};

/// Gzip level used for compressed outputs unless overridden
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Audit log file name, relative to the output directory
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// How many bases to cut from each end of sequence and quality lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimPolicy {
    /// Bases removed from the start of the line (5')
    pub trim_leading: usize,
    /// Bases removed from the end of the line (3')
    pub trim_trailing: usize,
    /// Write the removed bases to side outputs
    pub retain_trimmed: bool,
}

impl TrimPolicy {
    /// Build a policy, rejecting one that trims nothing
    pub fn new(trim_leading: usize, trim_trailing: usize, retain_trimmed: bool) -> Result<Self> {
        if trim_leading == 0 && trim_trailing == 0 {
            return Err(TrimError::InvalidPolicy {
                reason: "at least one of the 5' and 3' trim lengths must be positive".to_string(),
            });
        }
        Ok(Self {
            trim_leading,
            trim_trailing,
            retain_trimmed,
        })
    }

    /// A leading side output is written for this policy
    pub fn retains_leading(&self) -> bool {
        self.retain_trimmed && self.trim_leading > 0
    }

    /// A trailing side output is written for this policy
    pub fn retains_trailing(&self) -> bool {
        self.retain_trimmed && self.trim_trailing > 0
    }
}

/// Maximum number of files transformed at the same time. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerBudget(usize);

impl WorkerBudget {
    pub fn new(workers: usize) -> Self {
        Self(workers.max(1))
    }

    /// One worker per available CPU
    pub fn auto() -> Self {
        Self::new(num_cpus::get())
    }

    /// `None` and `Some(0)` both mean auto-detect
    pub fn from_override(workers: Option<usize>) -> Self {
        match workers {
            Some(n) if n > 0 => Self::new(n),
            _ => Self::auto(),
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for WorkerBudget {
    fn default() -> Self {
        Self::auto()
    }
}

/// Fully resolved settings for one batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub policy: TrimPolicy,
    pub force: bool,
    pub workers: WorkerBudget,
    pub compression_level: u32,
    pub log_file: String,
}

impl BatchConfig {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        input_dir: P,
        output_dir: Q,
        policy: TrimPolicy,
    ) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            policy,
            force: false,
            workers: WorkerBudget::auto(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_workers(mut self, workers: WorkerBudget) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_log_file<S: Into<String>>(mut self, name: S) -> Self {
        self.log_file = name.into();
        self
    }

    /// Create configuration from CLI arguments layered over the defaults file.
    /// CLI values win; the defaults file only fills what the CLI left unset.
    pub fn from_cli(cli: &Cli, defaults: &ConfigFile) -> Result<Self> {
        let policy = TrimPolicy::new(cli.trim_5prime, cli.trim_3prime, cli.keep)?;
        let workers = WorkerBudget::from_override(cli.threads.or(defaults.threads));
        let compression_level = cli
            .compression_level
            .or(defaults.compression_level)
            .unwrap_or(DEFAULT_COMPRESSION_LEVEL);
        let log_file = cli
            .log_file
            .clone()
            .or_else(|| defaults.log_file.clone())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        Ok(Self::new(&cli.input_dir, &cli.output_dir, policy)
            .with_force(cli.force)
            .with_workers(workers)
            .with_compression_level(compression_level)
            .with_log_file(log_file))
    }

    /// Path of the audit log for this run
    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(&self.log_file)
    }
}

/// Summary rendering picked from the CLI, then the defaults file
pub fn effective_summary_format(cli: &Cli, defaults: &ConfigFile) -> SummaryFormat {
    cli.summary_format
        .or(defaults.summary_format)
        .unwrap_or_default()
}
