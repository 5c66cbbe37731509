// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Two well-formed records with eight-base reads
pub const TWO_RECORDS: &str = "@r1\nACGTACGT\n+\nIIIIHHHH\n@r2\nTTTTGGGG\n+\n#####!!!\n";

/// Helper function to run fqtrim with given arguments
pub fn run_fqtrim(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_fqtrim"))
        .args(args)
        .arg("--ignore-config")
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute fqtrim");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Helper to run fqtrim over an input and output directory
pub fn run_fqtrim_dirs(input: &Path, output: &Path, args: &[&str]) -> (String, String, i32) {
    let mut full_args = vec![
        "-i",
        input.to_str().expect("utf-8 temp path"),
        "-o",
        output.to_str().expect("utf-8 temp path"),
    ];
    full_args.extend_from_slice(args);
    run_fqtrim(&full_args)
}

pub fn write_plain(path: &Path, content: &str) {
    fs::write(path, content).expect("Failed to write fixture");
}

pub fn write_gzip(path: &Path, content: &str) {
    let file = File::create(path).expect("Failed to create fixture");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(content.as_bytes())
        .expect("Failed to write fixture");
    encoder.finish().expect("Failed to finish gzip fixture");
}

pub fn is_gzip(path: &Path) -> bool {
    let bytes = fs::read(path).expect("Failed to read output");
    bytes.starts_with(&[0x1f, 0x8b])
}

/// Read a file as text, decompressing it when it is gzip
pub fn read_text(path: &Path) -> String {
    let bytes = fs::read(path).expect("Failed to read output");
    if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut text = String::new();
        MultiGzDecoder::new(&bytes[..])
            .read_to_string(&mut text)
            .expect("Failed to decompress output");
        text
    } else {
        String::from_utf8(bytes).expect("Output is not UTF-8")
    }
}

/// Audit log lines with the given event label
pub fn log_lines_with(log: &str, event: &str) -> usize {
    log.lines()
        .filter(|line| line.split_whitespace().nth(2) == Some(event))
        .count()
}
