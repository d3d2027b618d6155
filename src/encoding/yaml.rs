use serde::Serialize;
use std::io::{self, Cursor, Read};

use super::{CommentStyle, Encoder, Staged};

const DOCUMENT_SEPARATOR: &str = "---\n";

/// YAML encoder backed by `serde_yaml`.
///
/// Holds one or more documents; multiple documents are separated by `---`.
#[derive(Debug)]
pub struct Yaml {
    staged: Staged,
}

impl Yaml {
    /// Encodes a single document.
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Self {
        Self {
            staged: Staged::new(serde_yaml::to_string(value).map(String::into_bytes)),
        }
    }

    /// Encodes every value as its own document, in order.
    pub fn documents<T: Serialize>(values: &[T]) -> Self {
        let rendered = values
            .iter()
            .map(serde_yaml::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map(|docs| docs.join(DOCUMENT_SEPARATOR).into_bytes());
        Self {
            staged: Staged::new(rendered),
        }
    }

    /// Appends another document, possibly of a different type.
    pub fn and<T: Serialize + ?Sized>(self, value: &T) -> Self {
        let staged = match self.staged {
            Staged::Ready(cursor) => {
                let mut bytes = cursor.into_inner();
                match serde_yaml::to_string(value) {
                    Ok(doc) => {
                        bytes.extend_from_slice(DOCUMENT_SEPARATOR.as_bytes());
                        bytes.extend_from_slice(doc.as_bytes());
                        Staged::Ready(Cursor::new(bytes))
                    }
                    Err(e) => Staged::Failed(e.to_string()),
                }
            }
            failed => failed,
        };
        Self { staged }
    }
}

impl Read for Yaml {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.staged.read(buf)
    }
}

impl Encoder for Yaml {
    fn encode_comment(&self, text: &str) -> Vec<u8> {
        CommentStyle::Hash.render(text)
    }
}
