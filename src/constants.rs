//! Common constants used throughout confgen.

/// Provenance marker written at the top of every generated file.
pub const GENERATED_COMMENT: &str = "Generated by confgen. DO NOT EDIT.";

/// Supported configuration file names
pub const CONFIG_FILES: [&str; 3] = ["confgen.json", "confgen.yml", "confgen.yaml"];

/// Output directory used when neither the CLI nor the config file sets one
pub const DEFAULT_OUTPUT_DIR: &str = "gen";
