//! Markdown help text rendered to styled spans via `pulldown-cmark`.

use console::Color;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use super::StyledText;
use crate::style::Style;

const CODE: Style = Style::new().bold().fg(Color::Cyan);
const LINK: Style = Style::new().underline().fg(Color::Blue);

/// Converts Markdown to styled text drawn over `base`.
///
/// Paragraphs and other blocks are separated by a blank line; soft breaks
/// become spaces. Lists render with `•` bullets or `N.` numbers and nested
/// lists indent by two columns.
#[must_use]
pub fn from_markdown(source: &str, base: Style) -> StyledText {
    let mut state = State::new(base);
    for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH) {
        state.handle(event);
    }
    state.out
}

struct State {
    out: StyledText,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    at_item_start: bool,
    in_code_block: bool,
}

impl State {
    fn new(base: Style) -> Self {
        Self {
            out: StyledText::new(),
            styles: vec![base],
            lists: Vec::new(),
            at_item_start: false,
            in_code_block: false,
        }
    }

    fn current(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, style: Style) {
        let next = self.current().combine(style);
        self.styles.push(next);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn text(&mut self, text: &str) {
        let style = self.current();
        self.out.push_str(text, style);
        self.at_item_start = false;
    }

    fn start_block(&mut self) {
        if self.at_item_start {
            self.at_item_start = false;
            return;
        }
        if self.out.is_empty() {
            return;
        }
        if self.lists.is_empty() {
            self.out.push_str("\n\n", Style::new());
        } else {
            let indent = self.item_indent();
            self.out.push_str(&format!("\n{indent}  "), Style::new());
        }
    }

    fn item_indent(&self) -> String {
        "  ".repeat(self.lists.len().saturating_sub(1))
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.text(text.trim_end_matches('\n'));
                } else {
                    self.text(&text);
                }
            }
            Event::Code(code) => {
                let style = self.current().combine(CODE);
                self.out.push_str(&code, style);
                self.at_item_start = false;
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.text("\n"),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.start_block(),
            Tag::Heading { .. } => {
                self.start_block();
                self.push_style(Style::new().bold().underline());
            }
            Tag::CodeBlock(_) => {
                self.start_block();
                self.in_code_block = true;
                self.push_style(Style::new().dim());
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(first);
            }
            Tag::Item => self.start_item(),
            Tag::Emphasis => self.push_style(Style::new().italic()),
            Tag::Strong => self.push_style(Style::new().bold()),
            Tag::Strikethrough => self.push_style(Style::new().strike()),
            Tag::Link { .. } => self.push_style(LINK),
            _ => {}
        }
    }

    fn start_item(&mut self) {
        let ends_line = self
            .out
            .spans()
            .last()
            .is_some_and(|span| span.text.ends_with('\n'));
        if !self.out.is_empty() && !ends_line {
            self.out.push_str("\n", Style::new());
        }
        let indent = self.item_indent();
        let marker = match self.lists.last_mut() {
            Some(Some(number)) => {
                let marker = format!("{number}. ");
                *number += 1;
                marker
            }
            _ => "• ".to_owned(),
        };
        let prefix = format!("{indent}{marker}");
        self.out.push_str(&prefix, Style::new());
        self.at_item_start = true;
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_)
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link => self.pop_style(),
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.pop_style();
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("one\ntwo", "one two")]
    #[case("first\n\nsecond", "first\n\nsecond")]
    #[case("* a\n* b", "• a\n• b")]
    #[case("1. a\n2. b", "1. a\n2. b")]
    #[case("intro\n\n- x\n- y", "intro\n\n• x\n• y")]
    #[case("# Title\n\nbody", "Title\n\nbody")]
    #[case("- outer\n  - inner", "• outer\n  • inner")]
    fn lays_out_blocks(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(from_markdown(source, Style::new()).plain_text(), expected);
    }

    #[rstest]
    fn applies_inline_styles() {
        let text = from_markdown("a **b** *c* `d` [e](https://example.com)", Style::new());
        let find = |needle: &str| {
            text.spans()
                .iter()
                .find(|span| span.text == needle)
                .map(|span| span.style)
                .expect("span present")
        };
        assert!(find("b").is_bold());
        assert!(find("c").is_italic());
        assert_eq!(find("d").foreground(), Some(Color::Cyan));
        assert!(find("e").is_underline());
        assert_eq!(find("e").foreground(), Some(Color::Blue));
    }

    #[rstest]
    fn headings_are_bold_and_underlined() {
        let text = from_markdown("# Title", Style::new());
        let span = text.spans().first().expect("span");
        assert_eq!(span.text, "Title");
        assert!(span.style.is_bold() && span.style.is_underline());
    }

    #[rstest]
    fn keeps_the_base_style_underneath() {
        let text = from_markdown("**x**", Style::new().dim());
        let span = text.spans().first().expect("span");
        assert!(span.style.is_dim());
        assert!(span.style.is_bold());
    }
}
