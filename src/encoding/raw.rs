use std::io::{self, Cursor, Read};

use super::{CommentStyle, Encoder};

/// Passes pre-rendered text through unchanged.
#[derive(Debug)]
pub struct Raw {
    content: Cursor<Vec<u8>>,
    style: CommentStyle,
}

impl Raw {
    pub fn new(content: impl Into<String>, style: CommentStyle) -> Self {
        Self {
            content: Cursor::new(content.into().into_bytes()),
            style,
        }
    }
}

impl Read for Raw {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.content.read(buf)
    }
}

impl Encoder for Raw {
    fn encode_comment(&self, text: &str) -> Vec<u8> {
        self.style.render(text)
    }
}
