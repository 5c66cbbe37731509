// CLI-specific types and structures
// This module contains the command-line interface definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SummaryFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "fqtrim")]
#[command(about = "Trim a fixed number of bases from every read in a directory of FASTQ files")]
#[command(
    long_about = "Trim a fixed number of bases from every read in a directory of FASTQ files\n\nEvery .fq, .fq.gz, .fastq and .fastq.gz file in the input directory is\ntrimmed in parallel and written under the same name to the output directory.\nGzip input is detected by content and produces gzip output.\n\nEXAMPLES:\n  fqtrim -i raw/ -o trimmed/ -5 4 -3 4\n  fqtrim -i raw/ -o trimmed/ -3 10 --keep --threads 8"
)]
#[command(version)]
pub struct Cli {
    /// Directory containing the FASTQ files to trim
    #[arg(short = 'i', long = "in", value_name = "INPUT_DIRECTORY")]
    pub input_dir: PathBuf,

    /// Directory receiving trimmed files, side outputs and the log (created if missing)
    #[arg(short = 'o', long = "out", value_name = "OUTPUT_DIRECTORY")]
    pub output_dir: PathBuf,

    /// Bases to trim from the 5' end (start) of each read
    #[arg(short = '5', long = "N5prime", default_value_t = 0, help_heading = "Trimming")]
    pub trim_5prime: usize,

    /// Bases to trim from the 3' end (end) of each read
    #[arg(short = '3', long = "N3prime", default_value_t = 0, help_heading = "Trimming")]
    pub trim_3prime: usize,

    /// Write trimmed-off bases to 5-prime/ and 3-prime/ side outputs
    #[arg(short = 'k', long = "keep", help_heading = "Trimming")]
    pub keep: bool,

    /// Overwrite outputs that already exist instead of skipping them
    #[arg(short = 'f', long = "force", help_heading = "Trimming")]
    pub force: bool,

    /// Maximum files processed at once (0 = number of CPUs)
    #[arg(short = 'j', long = "threads", value_name = "N", help_heading = "Performance")]
    pub threads: Option<usize>,

    /// Gzip level for compressed outputs (0-9)
    #[arg(
        long = "compression-level",
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u32).range(0..=9),
        help_heading = "Performance"
    )]
    pub compression_level: Option<u32>,

    /// Audit log file name inside the output directory [default: log.txt]
    #[arg(long = "log-file", value_name = "NAME", help_heading = "Output")]
    pub log_file: Option<String>,

    /// Final summary format [default: table]
    #[arg(long = "summary-format", value_enum, help_heading = "Output")]
    pub summary_format: Option<SummaryFormat>,

    /// Exit with status 1 when any file failed
    #[arg(long = "strict", help_heading = "Output")]
    pub strict: bool,

    /// Read defaults from this file instead of the usual locations
    #[arg(long = "config-file", value_name = "PATH", help_heading = "Configuration")]
    pub config_file: Option<PathBuf>,

    /// Ignore configuration files
    #[arg(long = "ignore-config", conflicts_with = "config_file", help_heading = "Configuration")]
    pub ignore_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Logging")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose", help_heading = "Logging")]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter from -v/-q; RUST_LOG still overrides it
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_option_names() {
        let cli = Cli::try_parse_from([
            "fqtrim", "--in", "raw", "--out", "trimmed", "--N5prime", "4", "--N3prime", "2", "--keep",
            "--force",
        ])
        .unwrap();
        assert_eq!(cli.input_dir, PathBuf::from("raw"));
        assert_eq!(cli.output_dir, PathBuf::from("trimmed"));
        assert_eq!(cli.trim_5prime, 4);
        assert_eq!(cli.trim_3prime, 2);
        assert!(cli.keep && cli.force);
    }

    #[test]
    fn test_short_options() {
        let cli = Cli::try_parse_from(["fqtrim", "-i", "a", "-o", "b", "-3", "7", "-j", "2", "-vv"]).unwrap();
        assert_eq!(cli.trim_3prime, 7);
        assert_eq!(cli.trim_5prime, 0);
        assert_eq!(cli.threads, Some(2));
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["fqtrim", "-i", "a", "-o", "b", "-5", "-1"]).is_err());
        assert!(Cli::try_parse_from(["fqtrim", "-i", "a", "-o", "b", "--compression-level", "10"]).is_err());
        assert!(Cli::try_parse_from(["fqtrim", "-o", "b", "-5", "1"]).is_err());
        assert!(Cli::try_parse_from(["fqtrim", "-i", "a", "-o", "b", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_quiet_level() {
        let cli = Cli::try_parse_from(["fqtrim", "-i", "a", "-o", "b", "-5", "1", "-q"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
        assert_eq!(cli.summary_format, None);
    }
}
