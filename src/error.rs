//! Error handling for confgen.
//! Defines the error taxonomy shared by the file pool, the encoders and the generator.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for confgen operations.
///
/// Every variant is fatal for the generation run it occurs in. Library code
/// returns them to the caller, the binary prints them and exits.
#[derive(Error, Debug)]
pub enum Error {
    /// A file name passed to the pool was a path rather than a bare name.
    #[error("Invalid file name '{name}': expected a bare file name without path separators.")]
    InvalidFileName { name: String },

    /// A path segment pushed onto the pool's path stack was not a bare name.
    #[error("Invalid path segment '{segment}': expected a bare directory name.")]
    InvalidPathSegment { segment: String },

    /// The encoder stream could not be read to completion.
    #[error("Failed to encode '{name}': {source}.")]
    EncodingFailure {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Two entries resolved to the same output path within one pool.
    #[error("Filename clash: '{}' has already been added.", .path.display())]
    FilenameClash { path: PathBuf },

    /// A parent directory could not be created during the write pass.
    #[error("Failed to create directory '{}': {source}.", .path.display())]
    DirectoryCreationFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be written during the write pass.
    #[error("Failed to write file '{}': {source}.", .path.display())]
    FileWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stale file or directory could not be removed from the output root.
    #[error("Failed to remove stale path '{}': {source}.", .path.display())]
    StaleCleanupFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),
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
    eprintln!("{}", err);
    std::process::exit(1);
}
