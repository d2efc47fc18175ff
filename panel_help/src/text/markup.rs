//! Bracketed inline markup: `[bold red]text[/]`.
//!
//! A tag is a `[` followed by a lowercase letter or `/`, running to the next
//! `]`. Opening tags hold a style string; `[/]` closes the most recent tag and
//! `[/name]` closes the most recent tag with that exact text. A backslash
//! before `[` makes the bracket literal. Tags left open at the end of the text
//! close implicitly.

use super::StyledText;
use crate::error::PanelHelpError;
use crate::style::Style;

/// Parses markup into styled text drawn over `base`.
///
/// # Errors
///
/// Returns [`PanelHelpError::Markup`] for a closing tag with nothing to close
/// or an opening tag whose style string does not parse.
///
/// # Examples
///
/// ```
/// use panel_help::style::Style;
/// use panel_help::text::parse_markup;
///
/// let text = parse_markup("[bold]-v[/] verbose", Style::new()).expect("valid markup");
/// assert_eq!(text.plain_text(), "-v verbose");
/// ```
pub fn parse_markup(source: &str, base: Style) -> Result<StyledText, PanelHelpError> {
    let mut out = StyledText::new();
    let mut stack: Vec<(String, Style)> = Vec::new();
    let mut buf = String::new();
    let mut chars = source.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if ch == '\\' && chars.peek().is_some_and(|&(_, next)| next == '[') {
            buf.push('[');
            chars.next();
            continue;
        }
        if ch == '['
            && let Some(tag) = tag_at(source, offset)
        {
            out.push_str(&buf, current_style(base, &stack));
            buf.clear();
            apply_tag(&mut stack, tag, offset)?;
            let close = offset + 1 + tag.len();
            while chars.next_if(|&(idx, _)| idx <= close).is_some() {}
            continue;
        }
        buf.push(ch);
    }
    out.push_str(&buf, current_style(base, &stack));
    Ok(out)
}

const fn starts_tag(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch == '/'
}

fn tag_at(source: &str, offset: usize) -> Option<&str> {
    let rest = source.get(offset + 1..)?;
    if !rest.chars().next().is_some_and(starts_tag) {
        return None;
    }
    let end = rest.find([']', '['])?;
    if !rest.get(end..)?.starts_with(']') {
        return None;
    }
    rest.get(..end)
}

fn apply_tag(
    stack: &mut Vec<(String, Style)>,
    tag: &str,
    offset: usize,
) -> Result<(), PanelHelpError> {
    let Some(closing) = tag.strip_prefix('/') else {
        let style = Style::parse(tag)
            .map_err(|err| PanelHelpError::markup(offset, err.to_string()))?;
        stack.push((tag.trim().to_owned(), style));
        return Ok(());
    };
    let name = closing.trim();
    if name.is_empty() {
        if stack.pop().is_none() {
            return Err(PanelHelpError::markup(
                offset,
                "closing tag '[/]' has nothing to close",
            ));
        }
        return Ok(());
    }
    let position = stack
        .iter()
        .rposition(|(open, _)| open == name)
        .ok_or_else(|| {
            PanelHelpError::markup(
                offset,
                format!("closing tag '[/{name}]' has no matching opening tag"),
            )
        })?;
    stack.remove(position);
    Ok(())
}

fn current_style(base: Style, stack: &[(String, Style)]) -> Style {
    stack
        .iter()
        .fold(base, |acc, (_, style)| acc.combine(*style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn styles_tagged_runs() {
        let text = parse_markup("[bold]hi[/] there", Style::new()).expect("markup");
        let spans = text.spans();
        assert_eq!(spans.len(), 2);
        let first = spans.first().expect("tagged span");
        assert!(first.style.is_bold() && first.text == "hi");
        assert!(spans.get(1).is_some_and(|span| !span.style.is_bold()));
    }

    #[rstest]
    fn nests_and_closes_by_name() {
        let text = parse_markup("[red]a[bold]b[/bold]c[/red]", Style::new()).expect("markup");
        let styles: Vec<_> = text.spans().iter().map(|span| span.style).collect();
        assert_eq!(text.plain_text(), "abc");
        assert_eq!(styles.len(), 3);
        assert!(styles.get(1).is_some_and(Style::is_bold));
        assert!(styles.get(2).is_some_and(|style| !style.is_bold()));
    }

    #[rstest]
    #[case("[bold]x")]
    #[case("[1, 2] list")]
    #[case("a [b")]
    #[case("\\[bold]x")]
    #[case("[Upper] case")]
    fn leaves_non_tags_alone(#[case] input: &str) {
        let text = parse_markup(input, Style::new()).expect("markup");
        assert!(!text.plain_text().contains('\\'), "{text:?}");
    }

    #[rstest]
    fn backslash_makes_bracket_literal() {
        let text = parse_markup("\\[bold]x", Style::new()).expect("markup");
        assert_eq!(text.plain_text(), "[bold]x");
        assert!(text.spans().iter().all(|span| !span.style.is_bold()));
    }

    #[rstest]
    #[case("[/bold]x", 0)]
    #[case("x[/]", 1)]
    #[case("ok [sparkly]x", 3)]
    fn rejects_malformed_markup(#[case] input: &str, #[case] expected_offset: usize) {
        let err = parse_markup(input, Style::new()).expect_err("markup should fail");
        assert!(
            matches!(err, PanelHelpError::Markup { offset, .. } if offset == expected_offset),
            "{err}"
        );
    }
}
