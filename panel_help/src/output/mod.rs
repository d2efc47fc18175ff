//! Writers that turn [`StyledText`] lines into bytes.
//!
//! The renderer never emits escape sequences itself. It hands finished lines
//! to an [`OutputWriter`]: [`AnsiWriter`] paints them with `console`, and
//! [`PlainWriter`] writes the bare text.

mod ansi;
mod plain;
mod terminal;

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::text::StyledText;

pub use ansi::AnsiWriter;
pub use plain::PlainWriter;
pub use terminal::detect_width;

/// Destination for rendered lines.
pub trait OutputWriter {
    /// Writes one line followed by a newline.
    ///
    /// # Errors
    ///
    /// Propagates failures from the underlying writer.
    fn write_line(&mut self, line: &StyledText) -> io::Result<()>;

    /// Writes an empty line.
    ///
    /// # Errors
    ///
    /// Propagates failures from the underlying writer.
    fn write_blank(&mut self) -> io::Result<()> {
        self.write_line(&StyledText::new())
    }
}

/// Which standard stream output is headed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// Whether to emit escape sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Follow `console`'s detection for the target stream.
    #[default]
    Auto,
    /// Always colour.
    Always,
    /// Never colour.
    Never,
}

impl ColorChoice {
    /// Resolves the choice for `stream`.
    #[must_use]
    pub fn enabled_for(self, stream: Stream) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => match stream {
                Stream::Stdout => console::colors_enabled(),
                Stream::Stderr => console::colors_enabled_stderr(),
            },
        }
    }
}

/// Picks the writer matching `color`.
#[must_use]
pub fn writer_for<'a>(out: &'a mut dyn Write, color: bool) -> Box<dyn OutputWriter + 'a> {
    if color {
        Box::new(AnsiWriter::new(out))
    } else {
        Box::new(PlainWriter::new(out))
    }
}
