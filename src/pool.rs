//! The file pool: staging area for generated files.
//!
//! Files are added under the pool's current path stack and kept in memory
//! until [`FilePool::write`] flushes them to an output directory. Adding the
//! same resolved path twice is an error, never an overwrite.

use indexmap::IndexMap;
use log::{Level, Log, Record};
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::encoding::Encoder;
use crate::error::{Error, Result};

/// Stores and manages the files produced by one generation run.
pub struct FilePool {
    logger: &'static dyn Log,
    path: Vec<String>,
    entries: IndexMap<PathBuf, Vec<u8>>,
    top_level_comments: Vec<String>,
}

impl std::fmt::Debug for FilePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePool")
            .field("path", &self.path)
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .field("top_level_comments", &self.top_level_comments)
            .finish()
    }
}

impl Default for FilePool {
    fn default() -> Self {
        Self::new(log::logger())
    }
}

/// Returns true when `name` is a single, normal path component.
fn is_bare_name(name: &str) -> bool {
    Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

impl FilePool {
    /// Creates an empty pool logging through `logger`.
    pub fn new(logger: &'static dyn Log) -> Self {
        Self {
            logger,
            path: Vec::new(),
            entries: IndexMap::new(),
            top_level_comments: Vec::new(),
        }
    }

    /// Registers a comment rendered at the top of every file added afterwards.
    pub fn add_top_level_comment(&mut self, comment: impl Into<String>) {
        self.top_level_comments.push(comment.into());
    }

    pub fn top_level_comments(&self) -> &[String] {
        &self.top_level_comments
    }

    /// Current path stack, joined.
    pub fn current_path(&self) -> PathBuf {
        self.path.iter().collect()
    }

    /// Appends `segments` to the path stack.
    ///
    /// Either every segment is pushed or none is.
    pub fn push_path<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<()> {
        if let Some(bad) = segments.iter().map(AsRef::as_ref).find(|s| !is_bare_name(s)) {
            return Err(Error::InvalidPathSegment {
                segment: bad.to_string(),
            });
        }
        self.path.extend(segments.iter().map(|s| s.as_ref().to_string()));
        Ok(())
    }

    /// Removes the last segment from the path stack.
    pub fn pop_path(&mut self) -> Option<String> {
        self.path.pop()
    }

    /// Pushes `segments` and returns a guard that pops them again when dropped.
    pub fn scoped<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<Scope<'_>> {
        let restore = self.path.len();
        self.push_path(segments)?;
        Ok(Scope {
            pool: self,
            restore,
        })
    }

    /// Adds a file named `file_name` at the current path.
    ///
    /// The encoder is drained fully and the registered top-level comments are
    /// prepended in registration order.
    ///
    /// # Errors
    /// * `Error::InvalidFileName` if `file_name` is not a bare file name
    /// * `Error::EncodingFailure` if the encoder stream cannot be read
    /// * `Error::FilenameClash` if the resolved path was already added
    ///
    /// The pool is unchanged when an error is returned.
    pub fn add<E: Encoder>(&mut self, file_name: &str, mut encoder: E) -> Result<()> {
        if !is_bare_name(file_name) {
            return Err(Error::InvalidFileName {
                name: file_name.to_string(),
            });
        }

        let mut body = Vec::new();
        encoder.read_to_end(&mut body).map_err(|source| Error::EncodingFailure {
            name: file_name.to_string(),
            source,
        })?;

        let mut content = Vec::with_capacity(body.len());
        for comment in &self.top_level_comments {
            content.extend(encoder.encode_comment(comment));
        }
        content.extend(body);

        let output = self.current_path().join(file_name);

        // Check whether we have already staged something under this path.
        if self.entries.contains_key(&output) {
            return Err(Error::FilenameClash { path: output });
        }
        self.entries.insert(output, content);
        Ok(())
    }

    /// Staged content for `path`, relative to the output root.
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&[u8]> {
        self.entries.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Staged relative paths, in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every staged entry below `output_dir`.
    ///
    /// Missing directories are created and existing files overwritten. The
    /// first failure aborts the pass; files written before it are kept.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - Paths of the written files
    pub fn write<P: AsRef<Path>>(&self, output_dir: P) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        let mut written = Vec::with_capacity(self.entries.len());

        for (file, contents) in &self.entries {
            let out = output_dir.join(file);
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreationFailure {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            self.logger.log(
                &Record::builder()
                    .args(format_args!("Writing file: {}", out.display()))
                    .level(Level::Debug)
                    .target(module_path!())
                    .module_path_static(Some(module_path!()))
                    .file_static(Some(file!()))
                    .line(Some(line!()))
                    .build(),
            );
            fs::write(&out, contents).map_err(|source| Error::FileWriteFailure {
                path: out.clone(),
                source,
            })?;
            written.push(out);
        }
        Ok(written)
    }
}

/// A pool view rooted at a pushed sub-path.
///
/// Only adding files and nesting further scopes go through a scope; the
/// path stack itself is read-only here. Dropping the scope restores the
/// pool's previous path.
#[derive(Debug)]
pub struct Scope<'a> {
    pool: &'a mut FilePool,
    restore: usize,
}

impl Scope<'_> {
    /// Adds a file under this scope's path. See [`FilePool::add`].
    pub fn add<E: Encoder>(&mut self, file_name: &str, encoder: E) -> Result<()> {
        self.pool.add(file_name, encoder)
    }

    /// Nests a further sub-path inside this scope.
    pub fn scoped<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<Scope<'_>> {
        self.pool.scoped(segments)
    }
}

impl Deref for Scope<'_> {
    type Target = FilePool;

    fn deref(&self) -> &FilePool {
        self.pool
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.pool.path.truncate(self.restore);
    }
}
