//! Command-line interface implementation for confgen.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for confgen.
#[derive(Parser, Debug)]
#[command(author, version, about = "confgen: generate configuration files from typed Rust objects", long_about = None)]
pub struct Args {
    /// Directory the generated files are written to [default: gen]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to a confgen.json / confgen.yml / confgen.yaml configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Remove files in the output directory that this run did not generate.
    /// Files matching the configured keep patterns are left alone.
    #[arg(long)]
    pub clean_stale: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for invalid arguments
pub fn get_args() -> Args {
    Args::parse()
}
