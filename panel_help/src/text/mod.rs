//! Style-tagged text and the transformations applied to help strings.
//!
//! Everything the renderer produces is a [`StyledText`]: an ordered list of
//! [`Span`]s, each carrying a [`Style`]. Escape sequences are only produced
//! later by an [`crate::output::OutputWriter`].

mod highlight;
mod markdown;
mod markup;
mod wrap;

use unicode_width::UnicodeWidthStr;

use crate::style::Style;

pub use highlight::{UsageStyles, highlight_options, highlight_usage};
pub use markdown::from_markdown;
pub use markup::parse_markup;

/// A run of text drawn with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// The literal text of the span.
    pub text: String,
    /// Style used to draw the text.
    pub style: Style,
    /// Atomic spans are never split across lines by wrapping.
    pub atomic: bool,
}

/// A sequence of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    /// Creates empty text.
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Creates unstyled text.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::new())
    }

    /// Creates text drawn entirely in `style`.
    #[must_use]
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let mut out = Self::new();
        out.push_str(&text.into(), style);
        out
    }

    /// Appends `text`, merging with the previous span when styles match.
    pub fn push_str(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut()
            && !last.atomic
            && last.style == style
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(Span {
            text: text.to_owned(),
            style,
            atomic: false,
        });
    }

    /// Appends a span that wrapping keeps on a single line.
    pub fn push_atomic(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.spans.push(Span {
            text: text.replace('\n', " "),
            style,
            atomic: true,
        });
    }

    /// Appends every span of `other`.
    pub fn append(&mut self, other: Self) {
        for span in other.spans {
            if span.atomic {
                self.spans.push(span);
            } else {
                self.push_str(&span.text, span.style);
            }
        }
    }

    /// The spans in order.
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns `true` when there is no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(|span| span.text.width()).sum()
    }

    /// The text without styling.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Draws every span over `base`, so span styles win where they are set.
    #[must_use]
    pub fn with_base(self, base: Style) -> Self {
        Self {
            spans: self
                .spans
                .into_iter()
                .map(|span| Span {
                    style: base.combine(span.style),
                    ..span
                })
                .collect(),
        }
    }

    /// Pads with plain spaces up to `width` columns.
    pub fn pad_to(&mut self, width: usize) {
        let current = self.width();
        if current < width {
            self.push_str(&" ".repeat(width - current), Style::new());
        }
    }

    /// Wraps greedily to `width` columns.
    ///
    /// Newlines force a break and a logical line keeps its leading
    /// indentation. Atomic spans move to the next line whole unless they are
    /// wider than `width` on their own, in which case they are folded like
    /// any other over-long word. Always returns at least one line.
    #[must_use]
    pub fn wrap(&self, width: usize) -> Vec<Self> {
        wrap::wrap(self, width)
    }
}

impl From<&str> for StyledText {
    fn from(value: &str) -> Self {
        Self::plain(value)
    }
}
