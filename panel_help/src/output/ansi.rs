//! ANSI output through `console`.

use std::io::{self, Write};

use super::OutputWriter;
use crate::text::StyledText;

/// Writes lines with ANSI escape sequences, regardless of what `console`
/// detects for the underlying stream.
pub struct AnsiWriter<'a> {
    out: &'a mut dyn Write,
}

impl<'a> AnsiWriter<'a> {
    /// Wraps `out`.
    #[must_use]
    pub const fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }
}

impl OutputWriter for AnsiWriter<'_> {
    fn write_line(&mut self, line: &StyledText) -> io::Result<()> {
        for span in line.spans() {
            if span.style.is_plain() {
                write!(self.out, "{}", span.text)?;
            } else {
                write!(self.out, "{}", span.style.to_console().apply_to(&span.text))?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }
}
