//! Generation run orchestration.
//! Owns the file pool for a run, hands out sub-path scopes and performs the
//! final write pass.

use globset::GlobSet;
use log::{info, Log};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::config::{get_config, Config};
use crate::constants::GENERATED_COMMENT;
use crate::encoding::Encoder;
use crate::error::Result;
use crate::pool::{FilePool, Scope};
use crate::stale::prune_stale;

/// Outcome of [`Generator::generate`].
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Files written by the write pass
    pub written: Vec<PathBuf>,
    /// Stale files removed afterwards
    pub removed: Vec<PathBuf>,
}

/// Collects the files of one generation run and writes them out.
#[derive(Debug)]
pub struct Generator {
    output_dir: PathBuf,
    clean_stale: bool,
    keep: GlobSet,
    pool: FilePool,
}

impl Generator {
    /// Creates a generator logging through the global logger.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_logger(config, log::logger())
    }

    /// Creates a generator from the resolved configuration for `args`.
    ///
    /// See [`get_config`] for how the configuration file is located and how
    /// command-line flags override it.
    pub fn from_args(args: &Args) -> Result<Self> {
        Self::new(get_config(args)?)
    }

    /// Creates a generator whose pool logs through `logger`.
    ///
    /// Every file starts with the provenance marker followed by the
    /// configured header comments.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a keep pattern is invalid
    pub fn with_logger(config: Config, logger: &'static dyn Log) -> Result<Self> {
        let keep = config.keep_set()?;
        let mut pool = FilePool::new(logger);
        pool.add_top_level_comment(GENERATED_COMMENT);
        for comment in &config.header_comments {
            pool.add_top_level_comment(comment.as_str());
        }

        Ok(Self {
            output_dir: config.output_dir(),
            clean_stale: config.clean_stale,
            keep,
            pool,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Scope for adding files under `segments`.
    pub fn with<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<Scope<'_>> {
        self.pool.scoped(segments)
    }

    /// Adds a file at the root of the output directory.
    pub fn add<E: Encoder>(&mut self, file_name: &str, encoder: E) -> Result<()> {
        self.pool.add(file_name, encoder)
    }

    pub fn pool(&self) -> &FilePool {
        &self.pool
    }

    /// Writes every collected file, then prunes stale files when enabled.
    pub fn generate(self) -> Result<GenerationReport> {
        let written = self.pool.write(&self.output_dir)?;

        let removed = if self.clean_stale {
            let generated: HashSet<&Path> = self.pool.paths().collect();
            prune_stale(&self.output_dir, &generated, &self.keep)?
        } else {
            Vec::new()
        };

        info!(
            "Generated {} files in {} ({} stale removed)",
            written.len(),
            self.output_dir.display(),
            removed.len()
        );
        Ok(GenerationReport { written, removed })
    }
}
