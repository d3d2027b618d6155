use serde::Serialize;
use std::io::{self, Read};

use super::{Encoder, Staged};

/// Pretty-printed JSON encoder backed by `serde_json`.
///
/// JSON has no comment syntax, so header comments are not emitted.
#[derive(Debug)]
pub struct Json {
    staged: Staged,
}

impl Json {
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Self {
        let rendered = serde_json::to_vec_pretty(value).map(|mut bytes| {
            bytes.push(b'\n');
            bytes
        });
        Self {
            staged: Staged::new(rendered),
        }
    }
}

impl Read for Json {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.staged.read(buf)
    }
}

impl Encoder for Json {
    fn encode_comment(&self, _text: &str) -> Vec<u8> {
        Vec::new()
    }
}
