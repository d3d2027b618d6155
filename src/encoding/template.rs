//! MiniJinja-backed encoder for formats without a serde serializer
//! (Prometheus rule files, HCL, shell snippets, ...).

use minijinja::Environment;
use serde::Serialize;
use std::io::{self, Read};

use super::{CommentStyle, Encoder, Staged};

/// Renders a MiniJinja template against a serializable context.
#[derive(Debug)]
pub struct Template {
    staged: Staged,
    style: CommentStyle,
}

impl Template {
    /// Renders `source` with `context`.
    ///
    /// # Arguments
    /// * `source` - Template source
    /// * `context` - Any serializable value exposed to the template
    /// * `style` - Comment syntax of the rendered format
    ///
    /// # Notes
    /// Rendering errors are reported when the encoder is read.
    pub fn new<C: Serialize>(source: &str, context: C, style: CommentStyle) -> Self {
        Self {
            staged: Staged::new(render(source, context)),
            style,
        }
    }
}

fn render<C: Serialize>(source: &str, context: C) -> Result<Vec<u8>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("temp", source)?;

    let tmpl = env.get_template("temp")?;
    tmpl.render(context).map(String::into_bytes)
}

impl Read for Template {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.staged.read(buf)
    }
}

impl Encoder for Template {
    fn encode_comment(&self, text: &str) -> Vec<u8> {
        self.style.render(text)
    }
}
