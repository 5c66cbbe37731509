//! Append-only audit log shared by all workers
//!
//! Each entry is one line: `<timestamp> #<seq> <EVENT> <message>`. The
//! sequence number is assigned under the same lock that guards the write, so
//! sequence order and file order always agree.

use chrono::{SecondsFormat, Utc};
use log::warn;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{Result, TrimError};
use crate::outcome::{Outcome, OutcomeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent {
    /// Batch start and end
    Run,
    Attempt,
    Skip,
    Done,
    Fail,
}

impl AuditEvent {
    pub fn label(&self) -> &'static str {
        match self {
            AuditEvent::Run => "RUN",
            AuditEvent::Attempt => "ATTEMPT",
            AuditEvent::Skip => "SKIP",
            AuditEvent::Done => "DONE",
            AuditEvent::Fail => "FAIL",
        }
    }

    pub fn for_outcome(kind: &OutcomeKind) -> Self {
        match kind {
            OutcomeKind::Processed => AuditEvent::Done,
            OutcomeKind::Skipped(_) => AuditEvent::Skip,
            OutcomeKind::Failed(_) => AuditEvent::Fail,
        }
    }
}

struct AuditState {
    writer: Box<dyn Write + Send>,
    seq: u64,
}

pub struct AuditLog {
    state: Mutex<AuditState>,
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuditLog {{ entries: {} }}", self.entries())
    }
}

impl AuditLog {
    /// Open (or create) the log file in append mode
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| TrimError::Directory {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_writer(file))
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            state: Mutex::new(AuditState {
                writer: Box::new(writer),
                seq: 0,
            }),
        }
    }

    /// Write one whole entry and flush it
    pub fn append(&self, event: AuditEvent, message: &str) -> io::Result<()> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.seq += 1;
        let entry = format!(
            "{} #{:06} {:<7} {}\n",
            timestamp,
            state.seq,
            event.label(),
            message
        );
        state.writer.write_all(entry.as_bytes())?;
        state.writer.flush()
    }

    /// Append, reporting a failed write as a warning. Losing an audit line
    /// never fails the file it describes.
    pub fn record(&self, event: AuditEvent, message: &str) {
        if let Err(e) = self.append(event, message) {
            warn!("Failed to write audit log entry: {}", e);
        }
    }

    pub fn record_outcome(&self, outcome: &Outcome) {
        self.record(
            AuditEvent::for_outcome(&outcome.kind),
            &format!("{}: {}", outcome.path.display(), outcome.message),
        );
    }

    /// Entries written so far
    pub fn entries(&self) -> u64 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).seq
    }
}
