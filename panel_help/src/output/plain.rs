use std::io::{self, Write};

use super::OutputWriter;
use crate::text::StyledText;

/// Writes the text of each line with all styling dropped.
pub struct PlainWriter<'a> {
    out: &'a mut dyn Write,
}

impl<'a> PlainWriter<'a> {
    /// Wraps `out`.
    #[must_use]
    pub const fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }
}

impl OutputWriter for PlainWriter<'_> {
    fn write_line(&mut self, line: &StyledText) -> io::Result<()> {
        for span in line.spans() {
            self.out.write_all(span.text.as_bytes())?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}
