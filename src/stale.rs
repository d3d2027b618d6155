//! Removal of files left behind by earlier generation runs.

use globset::GlobSet;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

fn walk_error(root: &Path, e: walkdir::Error) -> Error {
    Error::StaleCleanupFailure {
        path: e.path().unwrap_or(root).to_path_buf(),
        source: e.into(),
    }
}

/// Removes every regular file below `output_dir` that is neither in
/// `generated` nor matched by `keep`, then removes directories left empty.
///
/// Paths in `generated` and patterns in `keep` are relative to `output_dir`.
/// Symlinks are never followed or removed, and no ancestor of a generated
/// path is touched. A missing `output_dir` is not an error.
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Removed files
pub fn prune_stale(
    output_dir: &Path,
    generated: &HashSet<&Path>,
    keep: &GlobSet,
) -> Result<Vec<PathBuf>> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }

    let protected: HashSet<&Path> = generated
        .iter()
        .flat_map(|path| path.ancestors())
        .filter(|ancestor| !ancestor.as_os_str().is_empty())
        .collect();

    let mut stale = Vec::new();
    for entry in WalkDir::new(output_dir).min_depth(1) {
        let entry = entry.map_err(|e| walk_error(output_dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(output_dir).unwrap_or(entry.path());
        if protected.contains(relative) || keep.is_match(relative) {
            continue;
        }
        stale.push(entry.into_path());
    }

    for path in &stale {
        debug!("Removing stale file: {}", path.display());
        fs::remove_file(path).map_err(|source| Error::StaleCleanupFailure {
            path: path.clone(),
            source,
        })?;
    }

    for entry in WalkDir::new(output_dir).min_depth(1).contents_first(true) {
        let entry = entry.map_err(|e| walk_error(output_dir, e))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let relative = entry.path().strip_prefix(output_dir).unwrap_or(entry.path());
        if protected.contains(relative) {
            continue;
        }
        let is_empty = fs::read_dir(entry.path())
            .map_err(|source| Error::StaleCleanupFailure {
                path: entry.path().to_path_buf(),
                source,
            })?
            .next()
            .is_none();
        if is_empty {
            debug!("Removing empty directory: {}", entry.path().display());
            fs::remove_dir(entry.path()).map_err(|source| Error::StaleCleanupFailure {
                path: entry.path().to_path_buf(),
                source,
            })?;
        }
    }

    Ok(stale)
}
