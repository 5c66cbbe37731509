//! Error types for fqtrim operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fqtrim operations
pub type Result<T> = std::result::Result<T, TrimError>;

/// Error type for fqtrim operations
///
/// `Directory` is fatal to a whole run. The per-file variants are caught at the
/// task boundary and turned into a failed outcome; they never stop the batch.
#[derive(Error, Debug)]
pub enum TrimError {
    /// Input directory unreadable, or an output directory could not be created
    #[error("Directory error for '{}': {source}", path.display())]
    Directory {
        /// The directory that could not be read or created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The input file could not be opened or sniffed
    #[error("Source open failed for '{}': {source}", path.display())]
    SourceOpen {
        /// The input file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A primary or side output could not be created
    #[error("Destination open failed for '{}': {source}", path.display())]
    DestinationOpen {
        /// The output file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A read or write failed while records were being transformed
    #[error("Stream error during transform of '{}': {source}", path.display())]
    Stream {
        /// The input file being transformed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Trim policy that would not change anything
    #[error("Invalid trim policy: {reason}")]
    InvalidPolicy {
        /// Explanation of why it's invalid
        reason: String,
    },

    /// Malformed configuration value
    #[error("Invalid configuration value for '{key}' in '{}': {reason}", path.display())]
    Config {
        /// The configuration file
        path: PathBuf,
        /// The offending key
        key: String,
        /// Explanation of the problem
        reason: String,
    },
}
