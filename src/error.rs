//! Failure classes of a run. Every variant is fatal and maps to exit code 1.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error type returned across port boundaries.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can stop a run before the output file is written.
#[derive(Debug, Error)]
pub enum RunError {
    /// Wrong positional argument count or an invalid flag.
    #[error("{0}")]
    Usage(String),

    /// The credential variable is unset or empty.
    #[error("Error: environment variable {var} is not set or is empty.")]
    MissingCredential {
        /// Name of the variable that was checked.
        var: &'static str,
    },

    /// The prompt file could not be read as UTF-8 text.
    #[error("Error reading input file {}: {source}", .path.display())]
    InputRead {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying filesystem error.
        source: PortError,
    },

    /// The completion call failed or returned no usable text.
    #[error("Error calling the completion API: {0}")]
    Request(PortError),

    /// The completion could not be written to the output file.
    #[error("Error writing output file {}: {source}", .path.display())]
    OutputWrite {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying filesystem error.
        source: PortError,
    },

    /// The runtime driving the HTTP client could not be built.
    #[error("Error starting the async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// A replay cassette could not be loaded or a recording not saved.
    #[error("Cassette error: {0}")]
    Cassette(String),
}
