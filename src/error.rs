//! Error handling for templatize.
//! Defines the error types and result alias used throughout the crate.

use thiserror::Error;

/// Problems with marker block sentinels inside a single text file.
///
/// Line numbers are 1-based.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MarkerBlockError {
    #[error("block opened at line {line} is never closed")]
    UnterminatedBlock { line: usize },

    #[error("end sentinel at line {line} has no matching start sentinel")]
    UnmatchedEnd { line: usize },

    #[error("start sentinel at line {line} appears inside the block opened at line {open_line}")]
    NestedStart { line: usize, open_line: usize },
}

/// Errors that can occur while compiling a template.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// File system failure on a file of the source or destination tree
    #[error("IO error on '{path}': {source}.")]
    FileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Represents errors raised while walking a directory tree
    #[error("Walk error: {0}.")]
    WalkError(#[from] walkdir::Error),

    /// Represents errors in loading or validating the configuration
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents invalid exclusion patterns
    #[error("Exclusion error: {0}.")]
    ExclusionError(String),

    #[error("Source directory '{source_dir}' does not exist.")]
    SourceDoesNotExistError { source_dir: String },

    #[error("'{path}' is outside of the source directory '{source_dir}'.")]
    OutsideSourceError { path: String, source_dir: String },

    /// Malformed marker sentinels in a source file
    #[error("Marker block error in '{path}': {source}.")]
    MarkerBlockError {
        path: String,
        #[source]
        source: MarkerBlockError,
    },
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
