//! Encoders turning typed objects into byte streams.
//! Each supported format implements [`Encoder`]: a readable stream of the
//! rendered object plus a way to render free text as a comment in that format.

use std::io::{self, Cursor, Read};

mod json;
mod raw;
mod template;
mod yaml;

pub use json::Json;
pub use raw::Raw;
pub use template::Template;
pub use yaml::Yaml;

/// A serialization format the file pool can consume.
///
/// Reading the encoder yields the rendered content. Rendering errors are
/// reported through the stream as [`io::ErrorKind::InvalidData`].
pub trait Encoder: Read {
    /// Renders `text` as a comment block in this format.
    ///
    /// Formats without comment syntax return an empty buffer.
    fn encode_comment(&self, text: &str) -> Vec<u8>;
}

impl<E: Encoder + ?Sized> Encoder for &mut E {
    fn encode_comment(&self, text: &str) -> Vec<u8> {
        (**self).encode_comment(text)
    }
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn encode_comment(&self, text: &str) -> Vec<u8> {
        (**self).encode_comment(text)
    }
}

/// Line comment syntax used by formats that let the caller choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentStyle {
    /// `# comment` (YAML, TOML, shell, Prometheus rules)
    #[default]
    Hash,
    /// `// comment` (Jsonnet, HCL, Go)
    DoubleSlash,
    /// `-- comment` (SQL, Lua)
    DoubleDash,
    /// No comment syntax; comments are dropped.
    None,
}

impl CommentStyle {
    fn prefix(self) -> Option<&'static str> {
        match self {
            CommentStyle::Hash => Some("#"),
            CommentStyle::DoubleSlash => Some("//"),
            CommentStyle::DoubleDash => Some("--"),
            CommentStyle::None => None,
        }
    }

    /// Renders every line of `text` prefixed with the comment marker.
    pub fn render(self, text: &str) -> Vec<u8> {
        let Some(prefix) = self.prefix() else {
            return Vec::new();
        };

        let mut out = String::new();
        for line in text.lines() {
            if line.is_empty() {
                out.push_str(prefix);
            } else {
                out.push_str(prefix);
                out.push(' ');
                out.push_str(line);
            }
            out.push('\n');
        }
        if out.is_empty() {
            out.push_str(prefix);
            out.push('\n');
        }
        out.into_bytes()
    }
}

/// Rendered output of an encoder, or the error that prevented rendering.
///
/// Serialization happens when the encoder is built; a failure is replayed on
/// every read so that draining the stream reports it.
#[derive(Debug)]
enum Staged {
    Ready(Cursor<Vec<u8>>),
    Failed(String),
}

impl Staged {
    fn new<E: std::fmt::Display>(result: std::result::Result<Vec<u8>, E>) -> Self {
        match result {
            Ok(bytes) => Staged::Ready(Cursor::new(bytes)),
            Err(e) => Staged::Failed(e.to_string()),
        }
    }
}

impl Read for Staged {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Staged::Ready(cursor) => cursor.read(buf),
            Staged::Failed(msg) => Err(io::Error::new(io::ErrorKind::InvalidData, msg.clone())),
        }
    }
}
