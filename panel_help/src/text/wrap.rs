//! Greedy word wrapping over styled spans.

use std::mem;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::StyledText;
use crate::style::Style;

type Piece = (String, Style);

const NARROW_PLACEHOLDER: char = '…';

#[derive(Debug)]
enum Token {
    Word(Vec<Piece>),
    Space(String, Style),
    Break,
}

pub(super) fn wrap(text: &StyledText, width: usize) -> Vec<StyledText> {
    let mut builder = LineBuilder::new(width.max(1));
    let mut pending: Option<Piece> = None;
    for token in tokenize(text) {
        match token {
            Token::Break => {
                builder.finish_line();
                builder.at_line_start = true;
                pending = None;
            }
            Token::Space(spaces, style) => {
                if builder.at_line_start {
                    builder.indent(&spaces, style);
                } else if builder.has_word {
                    pending = Some((spaces, style));
                }
            }
            Token::Word(pieces) => {
                builder.push_word(&pieces, pending.take());
            }
        }
    }
    builder.finish_line();
    builder.lines
}

fn tokenize(text: &StyledText) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<Piece> = Vec::new();
    for span in text.spans() {
        if span.atomic {
            push_text(&mut word, &span.text, span.style);
            continue;
        }
        for ch in span.text.chars() {
            match ch {
                '\n' => {
                    flush_word(&mut tokens, &mut word);
                    tokens.push(Token::Break);
                }
                ' ' | '\t' => {
                    flush_word(&mut tokens, &mut word);
                    let spaces = if ch == '\t' { "    " } else { " " };
                    if let Some(Token::Space(run, _)) = tokens.last_mut() {
                        run.push_str(spaces);
                    } else {
                        tokens.push(Token::Space(spaces.to_owned(), span.style));
                    }
                }
                '\r' => {}
                _ => {
                    let mut buf = [0_u8; 4];
                    push_text(&mut word, ch.encode_utf8(&mut buf), span.style);
                }
            }
        }
    }
    flush_word(&mut tokens, &mut word);
    tokens
}

fn push_text(word: &mut Vec<Piece>, text: &str, style: Style) {
    if let Some((last, last_style)) = word.last_mut()
        && *last_style == style
    {
        last.push_str(text);
    } else {
        word.push((text.to_owned(), style));
    }
}

fn flush_word(tokens: &mut Vec<Token>, word: &mut Vec<Piece>) {
    if !word.is_empty() {
        tokens.push(Token::Word(mem::take(word)));
    }
}

struct LineBuilder {
    width: usize,
    lines: Vec<StyledText>,
    current: StyledText,
    used: usize,
    has_word: bool,
    at_line_start: bool,
}

impl LineBuilder {
    const fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            current: StyledText::new(),
            used: 0,
            has_word: false,
            at_line_start: true,
        }
    }

    fn finish_line(&mut self) {
        let line = mem::take(&mut self.current);
        self.lines.push(if self.has_word {
            line
        } else {
            StyledText::new()
        });
        self.used = 0;
        self.has_word = false;
    }

    fn indent(&mut self, spaces: &str, style: Style) {
        let cols = spaces.width();
        if self.used + cols < self.width {
            self.current.push_str(spaces, style);
            self.used += cols;
        }
    }

    fn push_word(&mut self, pieces: &[Piece], gap: Option<Piece>) {
        let word_width: usize = pieces.iter().map(|(text, _)| text.width()).sum();
        let gap_width = gap.as_ref().map_or(0, |(spaces, _)| spaces.width());
        if self.has_word {
            if self.used + gap_width + word_width > self.width {
                self.finish_line();
            } else if let Some((spaces, style)) = gap {
                self.current.push_str(&spaces, style);
                self.used += gap_width;
            }
        }
        self.at_line_start = false;
        if self.used + word_width <= self.width {
            for (text, style) in pieces {
                self.current.push_str(text, *style);
            }
            self.used += word_width;
            self.has_word = true;
        } else {
            self.fold(pieces);
        }
    }

    fn fold(&mut self, pieces: &[Piece]) {
        self.has_word = true;
        for (text, style) in pieces {
            for ch in text.chars() {
                // A glyph wider than the whole line cannot be placed at all.
                let glyph = if ch.width().unwrap_or(0) > self.width {
                    NARROW_PLACEHOLDER
                } else {
                    ch
                };
                let cols = glyph.width().unwrap_or(0);
                if self.used + cols > self.width && self.used > 0 {
                    self.finish_line();
                    self.has_word = true;
                }
                let mut buf = [0_u8; 4];
                self.current.push_str(glyph.encode_utf8(&mut buf), *style);
                self.used += cols;
            }
        }
    }
}
