//! Record transform engine
//!
//! Streams FASTQ lines one at a time, tracking only the position of each line
//! inside its four-line record. Sequence and quality lines are trimmed; header
//! and separator lines pass through. Side sinks receive the removed fragments
//! together with the pass-through lines, so each side output is itself a
//! well-formed four-line-record file.

use serde::Serialize;
use std::io::{self, BufRead, Write};

use crate::config::TrimPolicy;

/// Which end of a line a side sink captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEnd {
    /// 5' end, start of the line
    Leading,
    /// 3' end, end of the line
    Trailing,
}

impl TrimEnd {
    /// Subdirectory of the output directory holding this end's side outputs
    pub fn dir_name(&self) -> &'static str {
        match self {
            TrimEnd::Leading => "5-prime",
            TrimEnd::Trailing => "3-prime",
        }
    }

    /// File name prefix distinguishing side outputs from primary outputs
    pub fn file_prefix(&self) -> &'static str {
        match self {
            TrimEnd::Leading => "trim5_",
            TrimEnd::Trailing => "trim3_",
        }
    }
}

/// Secondary output receiving the bases removed from one end
#[derive(Debug)]
pub struct SideSink<W> {
    pub end: TrimEnd,
    pub writer: W,
}

impl<W> SideSink<W> {
    pub fn new(end: TrimEnd, writer: W) -> Self {
        Self { end, writer }
    }
}

/// Role of a line inside a four-line FASTQ record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Sequence,
    Separator,
    Quality,
}

impl LineKind {
    /// Classify by zero-based line index since the start of the file
    pub fn at(index: u64) -> Self {
        match index % 4 {
            0 => LineKind::Header,
            1 => LineKind::Sequence,
            2 => LineKind::Separator,
            _ => LineKind::Quality,
        }
    }

    pub fn is_trimmed(&self) -> bool {
        matches!(self, LineKind::Sequence | LineKind::Quality)
    }
}

/// A trimmed line cut into its three parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSplit<'a> {
    pub leading: &'a [u8],
    pub kept: &'a [u8],
    pub trailing: &'a [u8],
}

/// Cut a line (without terminator) according to the policy.
///
/// All bounds are clamped to the line, so a line shorter than the combined
/// trim lengths keeps nothing. The two removed fragments may then overlap.
pub fn split_line<'a>(line: &'a [u8], policy: &TrimPolicy) -> LineSplit<'a> {
    let len = line.len();
    let start = policy.trim_leading.min(len);
    let end = len.saturating_sub(policy.trim_trailing).max(start);

    LineSplit {
        leading: &line[..start],
        kept: &line[start..end],
        trailing: &line[len.saturating_sub(policy.trim_trailing)..],
    }
}

/// Remove one trailing `\n`, or a `\r\n` pair. A lone `\r` can only end the
/// last line of a file and is stripped as well.
fn strip_terminator(line: &[u8]) -> &[u8] {
    match line {
        [rest @ .., b'\r', b'\n'] => rest,
        [rest @ .., b'\n'] => rest,
        [rest @ .., b'\r'] => rest,
        _ => line,
    }
}

fn write_line<W: Write>(writer: &mut W, content: &[u8]) -> io::Result<()> {
    writer.write_all(content)?;
    writer.write_all(b"\n")
}

/// Counters collected while a file is transformed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub lines: u64,
    /// Records seen, counting a trailing partial record
    pub records: u64,
    /// Sequence bases written to the primary output
    pub bases_kept: u64,
    /// Sequence bases cut away
    pub bases_removed: u64,
}

impl TransformStats {
    /// Input line count is not a multiple of four
    pub fn is_truncated(&self) -> bool {
        self.lines % 4 != 0
    }
}

/// Applies a trim policy to a FASTQ line stream
#[derive(Debug, Clone, Copy)]
pub struct RecordTrimmer {
    policy: TrimPolicy,
}

impl RecordTrimmer {
    pub fn new(policy: TrimPolicy) -> Self {
        Self { policy }
    }

    /// Consume `reader` to the end, writing to `primary` and every side sink.
    ///
    /// Every output line gets exactly one `\n`, including a final line that
    /// had none. An I/O error stops the transform; whatever was already
    /// written stays written.
    pub fn trim<R, W>(
        &self,
        reader: &mut R,
        primary: &mut W,
        sides: &mut [SideSink<W>],
    ) -> io::Result<TransformStats>
    where
        R: BufRead + ?Sized,
        W: Write,
    {
        let mut stats = TransformStats::default();
        let mut buf = Vec::with_capacity(512);
        let mut index: u64 = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = strip_terminator(&buf);
            let kind = LineKind::at(index);

            if kind.is_trimmed() {
                let split = split_line(line, &self.policy);
                write_line(primary, split.kept)?;
                for side in sides.iter_mut() {
                    let fragment = match side.end {
                        TrimEnd::Leading => split.leading,
                        TrimEnd::Trailing => split.trailing,
                    };
                    write_line(&mut side.writer, fragment)?;
                }
                if kind == LineKind::Sequence {
                    stats.bases_kept += split.kept.len() as u64;
                    stats.bases_removed += (line.len() - split.kept.len()) as u64;
                }
            } else {
                write_line(primary, line)?;
                for side in sides.iter_mut() {
                    write_line(&mut side.writer, line)?;
                }
            }

            index += 1;
        }

        stats.lines = index;
        stats.records = index.div_ceil(4);
        Ok(stats)
    }
}
