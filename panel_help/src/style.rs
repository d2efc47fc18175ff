//! Named text styles and their string form.
//!
//! Styles are written as whitespace-separated words, for example
//! `"bold cyan"`, `"dim yellow on blue"`, `"not bold"` or `"color(208)"`.
//! They parse into a [`Style`] that records only what the string set, so
//! styles can be layered with [`Style::combine`].

use std::fmt;
use std::str::FromStr;

use console::Color;
use serde::{Deserialize, Serialize};

use crate::error::PanelHelpError;

/// A foreground/background colour pair plus text attributes.
///
/// Every attribute is tri-state: unset, on, or explicitly off. Unset values
/// fall through to whatever style sits underneath when layered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Style {
    fg: Option<Paint>,
    bg: Option<Paint>,
    bold: Option<bool>,
    dim: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
    blink: Option<bool>,
    reverse: Option<bool>,
    strike: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Paint {
    color: Color,
    bright: bool,
}

#[derive(Debug, Clone, Copy)]
enum Attr {
    Bold,
    Dim,
    Italic,
    Underline,
    Blink,
    Reverse,
    Strike,
}

const ATTRS: [Attr; 7] = [
    Attr::Bold,
    Attr::Dim,
    Attr::Italic,
    Attr::Underline,
    Attr::Blink,
    Attr::Reverse,
    Attr::Strike,
];

impl Attr {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "bold" | "b" => Some(Self::Bold),
            "dim" | "d" => Some(Self::Dim),
            "italic" | "i" => Some(Self::Italic),
            "underline" | "u" => Some(Self::Underline),
            "blink" => Some(Self::Blink),
            "reverse" | "r" => Some(Self::Reverse),
            "strike" | "s" => Some(Self::Strike),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Dim => "dim",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Blink => "blink",
            Self::Reverse => "reverse",
            Self::Strike => "strike",
        }
    }
}

impl Style {
    /// A style that sets nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: None,
            dim: None,
            italic: None,
            underline: None,
            blink: None,
            reverse: None,
            strike: None,
        }
    }

    /// Sets the foreground colour.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(Paint {
            color,
            bright: false,
        });
        self
    }

    /// Sets the background colour.
    #[must_use]
    pub const fn on(mut self, color: Color) -> Self {
        self.bg = Some(Paint {
            color,
            bright: false,
        });
        self
    }

    /// Turns bold on.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    /// Turns dim on.
    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.dim = Some(true);
        self
    }

    /// Turns italic on.
    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    /// Turns underline on.
    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    /// Turns strikethrough on.
    #[must_use]
    pub const fn strike(mut self) -> Self {
        self.strike = Some(true);
        self
    }

    /// Parses a style string.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHelpError::InvalidStyle`] when a word is neither an
    /// attribute nor a colour, or when `on`/`not` lack an operand.
    ///
    /// # Examples
    ///
    /// ```
    /// use panel_help::style::Style;
    ///
    /// let style = Style::parse("bold cyan").expect("valid style");
    /// assert!(style.is_bold());
    /// assert_eq!(style.to_string(), "bold cyan");
    /// ```
    pub fn parse(value: &str) -> Result<Self, PanelHelpError> {
        let mut style = Self::new();
        let mut words = value.split_whitespace().map(str::to_ascii_lowercase);
        while let Some(word) = words.next() {
            match word.as_str() {
                "none" => {}
                "not" => {
                    let operand = words.next().ok_or_else(|| {
                        PanelHelpError::invalid_style(value, "'not' needs an attribute")
                    })?;
                    let attr = Attr::parse(&operand).ok_or_else(|| {
                        PanelHelpError::invalid_style(
                            value,
                            format!("unknown attribute '{operand}'"),
                        )
                    })?;
                    style.set(attr, false);
                }
                "on" => {
                    let operand = words.next().ok_or_else(|| {
                        PanelHelpError::invalid_style(value, "'on' needs a colour")
                    })?;
                    style.bg = Some(parse_paint(value, &operand)?);
                }
                other => {
                    if let Some(attr) = Attr::parse(other) {
                        style.set(attr, true);
                    } else {
                        style.fg = Some(parse_paint(value, other)?);
                    }
                }
            }
        }
        Ok(style)
    }

    /// Layers `over` on top of `self`; anything `over` sets wins.
    #[must_use]
    pub fn combine(self, over: Self) -> Self {
        Self {
            fg: over.fg.or(self.fg),
            bg: over.bg.or(self.bg),
            bold: over.bold.or(self.bold),
            dim: over.dim.or(self.dim),
            italic: over.italic.or(self.italic),
            underline: over.underline.or(self.underline),
            blink: over.blink.or(self.blink),
            reverse: over.reverse.or(self.reverse),
            strike: over.strike.or(self.strike),
        }
    }

    /// Returns `true` when the style sets nothing at all.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::new()
    }

    /// Whether the bold attribute is on.
    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.get(Attr::Bold) == Some(true)
    }

    /// Whether the dim attribute is on.
    #[must_use]
    pub fn is_dim(&self) -> bool {
        self.get(Attr::Dim) == Some(true)
    }

    /// Whether the italic attribute is on.
    #[must_use]
    pub fn is_italic(&self) -> bool {
        self.get(Attr::Italic) == Some(true)
    }

    /// Whether the underline attribute is on.
    #[must_use]
    pub fn is_underline(&self) -> bool {
        self.get(Attr::Underline) == Some(true)
    }

    /// The foreground colour, if set.
    #[must_use]
    pub fn foreground(&self) -> Option<Color> {
        self.fg.map(|paint| paint.color)
    }

    /// The background colour, if set.
    #[must_use]
    pub fn background(&self) -> Option<Color> {
        self.bg.map(|paint| paint.color)
    }

    /// Converts into a `console` style with styling forced on.
    #[must_use]
    pub fn to_console(&self) -> console::Style {
        let mut out = console::Style::new().force_styling(true);
        if let Some(paint) = self.fg {
            out = out.fg(paint.color);
            if paint.bright {
                out = out.bright();
            }
        }
        if let Some(paint) = self.bg {
            out = out.bg(paint.color);
            if paint.bright {
                out = out.on_bright();
            }
        }
        for attr in ATTRS {
            if self.get(attr) != Some(true) {
                continue;
            }
            out = match attr {
                Attr::Bold => out.bold(),
                Attr::Dim => out.dim(),
                Attr::Italic => out.italic(),
                Attr::Underline => out.underlined(),
                Attr::Blink => out.blink(),
                Attr::Reverse => out.reverse(),
                Attr::Strike => out.strikethrough(),
            };
        }
        out
    }

    const fn get(&self, attr: Attr) -> Option<bool> {
        match attr {
            Attr::Bold => self.bold,
            Attr::Dim => self.dim,
            Attr::Italic => self.italic,
            Attr::Underline => self.underline,
            Attr::Blink => self.blink,
            Attr::Reverse => self.reverse,
            Attr::Strike => self.strike,
        }
    }

    const fn set(&mut self, attr: Attr, on: bool) {
        let slot = match attr {
            Attr::Bold => &mut self.bold,
            Attr::Dim => &mut self.dim,
            Attr::Italic => &mut self.italic,
            Attr::Underline => &mut self.underline,
            Attr::Blink => &mut self.blink,
            Attr::Reverse => &mut self.reverse,
            Attr::Strike => &mut self.strike,
        };
        *slot = Some(on);
    }
}

fn parse_paint(source: &str, word: &str) -> Result<Paint, PanelHelpError> {
    let (name, bright) = word
        .strip_prefix("bright_")
        .map_or((word, false), |rest| (rest, true));
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" if !bright => Color::Color256(8),
        _ => {
            let index = name
                .strip_prefix("color(")
                .and_then(|rest| rest.strip_suffix(')'))
                .filter(|_| !bright)
                .ok_or_else(|| {
                    PanelHelpError::invalid_style(source, format!("unknown word '{word}'"))
                })?;
            let number = index.parse::<u8>().map_err(|_| {
                PanelHelpError::invalid_style(
                    source,
                    format!("colour index '{index}' is not 0-255"),
                )
            })?;
            Color::Color256(number)
        }
    };
    Ok(Paint { color, bright })
}

fn paint_name(paint: Paint) -> String {
    let base = match paint.color {
        Color::Black => "black".to_owned(),
        Color::Red => "red".to_owned(),
        Color::Green => "green".to_owned(),
        Color::Yellow => "yellow".to_owned(),
        Color::Blue => "blue".to_owned(),
        Color::Magenta => "magenta".to_owned(),
        Color::Cyan => "cyan".to_owned(),
        Color::White => "white".to_owned(),
        Color::Color256(index) => format!("color({index})"),
    };
    if paint.bright {
        format!("bright_{base}")
    } else {
        base
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::new();
        for attr in ATTRS {
            match self.get(attr) {
                Some(true) => words.push(attr.name().to_owned()),
                Some(false) => words.push(format!("not {}", attr.name())),
                None => {}
            }
        }
        if let Some(paint) = self.fg {
            words.push(paint_name(paint));
        }
        if let Some(paint) = self.bg {
            words.push(format!("on {}", paint_name(paint)));
        }
        if words.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&words.join(" "))
        }
    }
}

impl FromStr for Style {
    type Err = PanelHelpError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Style {
    type Error = PanelHelpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Style> for String {
    fn from(style: Style) -> Self {
        style.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bold cyan", "bold cyan")]
    #[case("  DIM   yellow ", "dim yellow")]
    #[case("red on bright_blue", "red on bright_blue")]
    #[case("not bold", "not bold")]
    #[case("color(208) u", "underline color(208)")]
    #[case("", "none")]
    #[case("none", "none")]
    fn parses_and_prints_canonical_form(#[case] input: &str, #[case] expected: &str) {
        let style = Style::parse(input).expect("style should parse");
        assert_eq!(style.to_string(), expected);
    }

    #[rstest]
    #[case("sparkly")]
    #[case("on")]
    #[case("not purple")]
    #[case("color(300)")]
    #[case("bright_grey")]
    fn rejects_unknown_words(#[case] input: &str) {
        let err = Style::parse(input).expect_err("style should be rejected");
        assert!(matches!(err, PanelHelpError::InvalidStyle { .. }), "{err}");
    }

    #[rstest]
    fn combine_prefers_the_upper_layer() {
        let base = Style::parse("dim yellow").expect("base");
        let over = Style::parse("not dim red bold").expect("over");
        let merged = base.combine(over);
        assert!(!merged.is_dim());
        assert!(merged.is_bold());
        assert_eq!(merged.foreground(), Some(Color::Red));
    }

    #[rstest]
    fn combine_keeps_unset_attributes_from_below() {
        let merged = Style::parse("italic on black")
            .expect("base")
            .combine(Style::parse("green").expect("over"));
        assert!(merged.is_italic());
        assert_eq!(merged.background(), Some(Color::Black));
        assert_eq!(merged.foreground(), Some(Color::Green));
    }

    #[rstest]
    fn console_conversion_emits_escape_sequences() {
        let style = Style::parse("bold red").expect("style");
        let painted = style.to_console().apply_to("x").to_string();
        assert!(
            painted.contains('\u{1b}'),
            "expected ANSI codes: {painted:?}"
        );
        assert_eq!(console::strip_ansi_codes(&painted), "x");
    }
}
