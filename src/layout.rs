//! Input discovery and output path layout
//!
//! Primary outputs keep the input file name directly under the output
//! directory. Side outputs go to `5-prime/trim5_<name>` and
//! `3-prime/trim3_<name>`.

use log::warn;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TrimPolicy;
use crate::error::{Result, TrimError};
use crate::transform::TrimEnd;

/// File name suffixes picked up from the input directory
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[".fq", ".fq.gz", ".fastq", ".fastq.gz"];

pub fn has_recognized_extension(file_name: &OsStr) -> bool {
    let name = file_name.to_string_lossy();
    RECOGNIZED_EXTENSIONS
        .iter()
        .any(|ext| name.len() > ext.len() && name.ends_with(ext))
}

/// List regular files (or links to them) with a recognized extension.
/// Sorted by name so logs are stable between runs.
pub fn discover_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir).map_err(|source| TrimError::Directory {
        path: input_dir.to_path_buf(),
        source,
    })?;

    let mut inputs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", input_dir.display(), e);
                continue;
            }
        };
        if !has_recognized_extension(&entry.file_name()) {
            continue;
        }
        let path = entry.path();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => inputs.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    inputs.sort();
    Ok(inputs)
}

/// Where the outputs of a batch run are written
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    side_ends: Vec<TrimEnd>,
}

impl OutputLayout {
    pub fn new<P: AsRef<Path>>(root: P, policy: &TrimPolicy) -> Self {
        let mut side_ends = Vec::new();
        if policy.retains_leading() {
            side_ends.push(TrimEnd::Leading);
        }
        if policy.retains_trailing() {
            side_ends.push(TrimEnd::Trailing);
        }
        Self {
            root: root.as_ref().to_path_buf(),
            side_ends,
        }
    }

    /// Ends that get a side output under this policy
    pub fn side_ends(&self) -> &[TrimEnd] {
        &self.side_ends
    }

    pub fn primary_path(&self, file_name: &OsStr) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn side_dir(&self, end: TrimEnd) -> PathBuf {
        self.root.join(end.dir_name())
    }

    pub fn side_path(&self, end: TrimEnd, file_name: &OsStr) -> PathBuf {
        let mut name = std::ffi::OsString::from(end.file_prefix());
        name.push(file_name);
        self.side_dir(end).join(name)
    }

    /// Create the output directory and any side output subdirectories
    pub fn prepare(&self) -> Result<()> {
        let mut dirs = vec![self.root.clone()];
        dirs.extend(self.side_ends.iter().map(|end| self.side_dir(*end)));

        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|source| TrimError::Directory { path: dir, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_recognized_extensions() {
        for name in ["a.fq", "a.fq.gz", "a.fastq", "sample_R1.fastq.gz"] {
            assert!(has_recognized_extension(OsStr::new(name)), "{name}");
        }
        for name in ["a.fa", "a.fq.bz2", "a.gz", "notes.txt", ".fq", "a.fastq.gz.tmp"] {
            assert!(!has_recognized_extension(OsStr::new(name)), "{name}");
        }
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.fastq", "a.fq.gz", "readme.md", "c.fq"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.fq")).unwrap();

        let found: Vec<String> = discover_inputs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found, vec!["a.fq.gz", "b.fastq", "c.fq"]);
    }

    #[test]
    fn test_missing_input_dir() {
        let dir = TempDir::new().unwrap();
        let err = discover_inputs(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, TrimError::Directory { .. }));
    }

    #[test]
    fn test_side_paths() {
        let policy = TrimPolicy::new(3, 2, true).unwrap();
        let layout = OutputLayout::new("/out", &policy);
        let name = OsStr::new("s.fq.gz");

        assert_eq!(layout.primary_path(name), PathBuf::from("/out/s.fq.gz"));
        assert_eq!(
            layout.side_path(TrimEnd::Leading, name),
            PathBuf::from("/out/5-prime/trim5_s.fq.gz")
        );
        assert_eq!(
            layout.side_path(TrimEnd::Trailing, name),
            PathBuf::from("/out/3-prime/trim3_s.fq.gz")
        );
    }

    #[test]
    fn test_prepare_creates_only_active_side_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("out");
        let policy = TrimPolicy::new(0, 4, true).unwrap();
        let layout = OutputLayout::new(&root, &policy);
        layout.prepare().unwrap();

        assert!(root.join("3-prime").is_dir());
        assert!(!root.join("5-prime").exists());
        assert_eq!(layout.side_ends(), &[TrimEnd::Trailing]);
    }

    #[test]
    fn test_prepare_fails_under_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let policy = TrimPolicy::new(1, 0, false).unwrap();
        let err = OutputLayout::new(blocker.join("out"), &policy)
            .prepare()
            .unwrap_err();
        assert!(matches!(err, TrimError::Directory { .. }));
    }
}
