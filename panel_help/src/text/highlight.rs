//! Highlighting of option mentions inside help and usage text.
//!
//! A long option is `--` followed by an alphanumeric character and then any
//! run of word characters or dashes. A switch is a single `-` followed by a
//! letter and word characters. Both must start the text or follow a character
//! that is neither a word character nor a dash, so `re-run` and `a--b` are
//! left alone.

use super::StyledText;
use crate::style::Style;

/// Styles used when highlighting a usage line.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageStyles {
    /// Style for everything that is not highlighted.
    pub base: Style,
    /// Style for `<NAME>` and `[OPTIONS]` tokens.
    pub metavar: Style,
    /// Style for `--long` mentions.
    pub option: Style,
    /// Style for `-s` mentions.
    pub switch: Style,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Plain,
    Long,
    Short,
    Metavar,
}

/// Highlights option and switch mentions in non-atomic spans.
///
/// The highlight style is layered over each span's own style.
#[must_use]
pub fn highlight_options(text: &StyledText, option: Style, switch: Style) -> StyledText {
    let mut out = StyledText::new();
    for span in text.spans() {
        if span.atomic {
            out.push_atomic(&span.text, span.style);
            continue;
        }
        for (kind, segment) in scan(&span.text, false) {
            let style = match kind {
                Kind::Long => span.style.combine(option),
                Kind::Short => span.style.combine(switch),
                Kind::Plain | Kind::Metavar => span.style,
            };
            out.push_str(&segment, style);
        }
    }
    out
}

/// Highlights a usage line: options, switches and metavar placeholders.
#[must_use]
pub fn highlight_usage(usage: &str, styles: &UsageStyles) -> StyledText {
    let mut out = StyledText::new();
    for (kind, segment) in scan(usage, true) {
        let style = match kind {
            Kind::Plain => styles.base,
            Kind::Long => styles.base.combine(styles.option),
            Kind::Short => styles.base.combine(styles.switch),
            Kind::Metavar => styles.base.combine(styles.metavar),
        };
        out.push_str(&segment, style);
    }
    out
}

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn scan(text: &str, metavars: bool) -> Vec<(Kind, String)> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments: Vec<(Kind, String)> = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        let boundary = index
            .checked_sub(1)
            .and_then(|prev| chars.get(prev))
            .is_none_or(|&prev| !is_word(prev) && prev != '-');
        let option = boundary.then(|| option_at(&chars, index)).flatten();
        let metavar = || metavars.then(|| metavar_at(&chars, index)).flatten();
        let found = option.or_else(metavar);
        let (kind, len) = found.unwrap_or((Kind::Plain, 1));
        let segment: String = chars.iter().skip(index).take(len).collect();
        match segments.last_mut() {
            Some((last, text_so_far)) if *last == kind && kind == Kind::Plain => {
                text_so_far.push_str(&segment);
            }
            _ => segments.push((kind, segment)),
        }
        index += len;
    }
    segments
}

fn option_at(chars: &[char], start: usize) -> Option<(Kind, usize)> {
    let rest = chars.get(start..)?;
    match rest {
        ['-', '-', first, ..] if first.is_alphanumeric() => {
            let tail = rest
                .iter()
                .skip(2)
                .take_while(|&&ch| is_word(ch) || ch == '-')
                .count();
            Some((Kind::Long, 2 + tail))
        }
        ['-', first, ..] if first.is_alphabetic() => {
            let tail = rest.iter().skip(1).take_while(|&&ch| is_word(ch)).count();
            Some((Kind::Short, 1 + tail))
        }
        _ => None,
    }
}

fn metavar_at(chars: &[char], start: usize) -> Option<(Kind, usize)> {
    let rest = chars.get(start..)?;
    let close = match rest {
        ['<', ..] => '>',
        ['[', first, ..] if first.is_uppercase() => ']',
        _ => return None,
    };
    let end = rest.iter().position(|&ch| ch == close)?;
    Some((Kind::Metavar, end + 1))
}
