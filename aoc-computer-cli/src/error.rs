//! Error types for the CLI

use aoc_computer::{MachineError, ParseError, SearchError};
use std::path::PathBuf;
use thiserror::Error;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Program file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Program file could not be parsed
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The machine faulted while running the program
    #[error("Machine error: {0}")]
    Machine(#[from] MachineError),

    /// A quine search hit a fatal fault
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// No initial A reproduces the program
    #[error("No quine seed found for {}", .path.display())]
    NoSeed { path: PathBuf },

    /// Thread pool creation failed
    #[error("Thread pool creation failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
