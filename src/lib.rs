//! confgen generates configuration files from typed Rust objects.
//! Objects are serialized through pluggable encoders, staged in a file pool
//! under deterministic paths and written to an output directory in one pass.
//! Two outputs resolving to the same path are reported, never overwritten.

/// Command-line interface module for the confgen binary
pub mod cli;

/// Configuration handling
/// Supports JSON and YAML formats (confgen.json, confgen.yml, confgen.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Encoders turning objects into bytes: YAML, JSON, MiniJinja templates and raw text
pub mod encoding;

/// Error types and handling for confgen
pub mod error;

/// Generation run orchestration
pub mod generator;

/// Logger initialisation for the binary
pub mod logger;

/// File pool: staging, collision detection and the write pass
pub mod pool;

/// Resource definitions used by the bundled generator
pub mod resources;

/// Removal of stale files from earlier runs
pub mod stale;

pub use encoding::{CommentStyle, Encoder};
pub use error::{Error, Result};
pub use generator::{GenerationReport, Generator};
pub use pool::FilePool;
