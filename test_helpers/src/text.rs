//! Helpers for picking rendered help output apart.
//!
//! Output may or may not carry ANSI escapes; every helper strips them first.

use unicode_width::UnicodeWidthStr;

const TOP_LEFT: &[char] = &['╭', '┌', '┏', '╔', '+'];
const TOP_RIGHT: &[char] = &['╮', '┐', '┓', '╗', '+'];
const BOTTOM_LEFT: &[char] = &['╰', '└', '┗', '╚', '+'];
const HORIZONTAL: &[char] = &['─', '━', '═', '-'];
const VERTICAL: &[char] = &['│', '┃', '║', '|'];

/// Removes ANSI escape sequences.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    console::strip_ansi_codes(text).into_owned()
}

/// Whether `text` contains any ANSI escape sequence.
#[must_use]
pub fn has_ansi(text: &str) -> bool {
    text.contains('\u{1b}')
}

/// The output split into lines with escapes removed.
#[must_use]
pub fn plain_lines(text: &str) -> Vec<String> {
    strip_ansi(text).lines().map(str::to_owned).collect()
}

/// Terminal columns taken by `line` once escapes are removed.
#[must_use]
pub fn display_width(line: &str) -> usize {
    strip_ansi(line).width()
}

fn title_of(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let inner = trimmed
        .strip_prefix(TOP_LEFT)?
        .strip_suffix(TOP_RIGHT)?;
    let title = inner.trim_matches(HORIZONTAL).trim();
    (!title.is_empty()).then(|| title.to_owned())
}

/// Titles of every panel, top to bottom.
#[must_use]
pub fn panel_titles(text: &str) -> Vec<String> {
    plain_lines(text)
        .iter()
        .filter_map(|line| title_of(line))
        .collect()
}

/// The content lines of the first panel titled `title`, with borders and
/// trailing padding removed. Empty when no such panel exists.
#[must_use]
pub fn panel_body(text: &str, title: &str) -> Vec<String> {
    plain_lines(text)
        .iter()
        .skip_while(|line| title_of(line).as_deref() != Some(title))
        .skip(1)
        .take_while(|line| !line.trim_start().starts_with(BOTTOM_LEFT))
        .map(|line| {
            line.trim()
                .trim_start_matches(VERTICAL)
                .trim_end_matches(VERTICAL)
                .trim_end()
                .strip_prefix(' ')
                .unwrap_or_default()
                .to_owned()
        })
        .collect()
}
