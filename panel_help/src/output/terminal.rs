/// Width of the terminal attached to stdout, if any.
#[must_use]
pub fn detect_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(terminal_size::Width(width), _)| usize::from(width))
}
