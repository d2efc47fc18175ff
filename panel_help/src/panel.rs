//! Titled, bordered panels and their layout.
//!
//! A panel body is either a table of [`Row`]s or free text. Table columns are
//! sized per panel: the label and metavar columns take their natural width
//! unless that would squeeze the help column below a third of the panel, in
//! which case they shrink and their cells wrap.

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::groups::ResolvedGroup;
use crate::rows::Row;
use crate::style::Style;
use crate::text::StyledText;

const COLUMN_GAP: usize = 2;
const MIN_HELP_WIDTH: usize = 10;
/// Narrowest a shrunk column may get; one double-width glyph must fit.
const MIN_CELL_WIDTH: usize = 2;

/// Where the title sits in the top border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelAlign {
    /// Against the left corner.
    #[default]
    Left,
    /// Centred.
    Center,
    /// Against the right corner.
    Right,
}

/// Border character set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxStyle {
    /// `╭─╮` with rounded corners.
    #[default]
    Rounded,
    /// `┌─┐`.
    Square,
    /// `┏━┓`.
    Heavy,
    /// `╔═╗`.
    Double,
    /// `+-+` for terminals without box drawing glyphs.
    Ascii,
}

struct BoxChars {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

impl BoxStyle {
    const fn chars(self) -> BoxChars {
        let (top_left, top_right, bottom_left, bottom_right, horizontal, vertical) = match self {
            Self::Rounded => ('╭', '╮', '╰', '╯', '─', '│'),
            Self::Square => ('┌', '┐', '└', '┘', '─', '│'),
            Self::Heavy => ('┏', '┓', '┗', '┛', '━', '┃'),
            Self::Double => ('╔', '╗', '╚', '╝', '═', '║'),
            Self::Ascii => ('+', '+', '+', '+', '-', '|'),
        };
        BoxChars {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            horizontal,
            vertical,
        }
    }
}

/// Panel contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    /// Aligned rows.
    Table(Vec<Row>),
    /// Wrapped free text.
    Text(StyledText),
}

/// A titled, bordered block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    /// Title drawn in the top border.
    pub title: String,
    /// Contents.
    pub body: PanelBody,
    /// Style of the border characters.
    pub border_style: Style,
    /// Title alignment.
    pub align: PanelAlign,
    /// Border character set.
    pub box_style: BoxStyle,
}

/// Turns resolved groups of rows into panels, one per group, keeping order.
///
/// Unnamed groups take `title_for_untitled`.
#[must_use]
pub fn assemble(
    groups: Vec<ResolvedGroup<Row>>,
    title_for_untitled: &str,
    border_style: Style,
    align: PanelAlign,
    box_style: BoxStyle,
) -> Vec<Panel> {
    groups
        .into_iter()
        .map(|group| Panel {
            title: group.name.unwrap_or_else(|| title_for_untitled.to_owned()),
            body: PanelBody::Table(group.items),
            border_style,
            align,
            box_style,
        })
        .collect()
}

struct Columns {
    label: usize,
    metavar: Option<usize>,
    help: usize,
}

impl Panel {
    /// Lays the panel out as lines exactly `width` columns wide.
    ///
    /// Tables need room for a help column of ten cells plus the gaps and
    /// borders; below about twenty columns lines may run long.
    #[must_use]
    pub fn render(&self, width: usize) -> Vec<StyledText> {
        let outer = width.max(5);
        let inner = outer - 4;
        let chars = self.box_style.chars();
        let mut lines = vec![self.top_border(outer, &chars)];
        let body = match &self.body {
            PanelBody::Table(rows) => self.table_lines(rows, inner),
            PanelBody::Text(text) => text.wrap(inner),
        };
        for mut content in body {
            content.pad_to(inner);
            let mut line = StyledText::styled(format!("{} ", chars.vertical), self.border_style);
            line.append(content);
            line.push_str(&format!(" {}", chars.vertical), self.border_style);
            lines.push(line);
        }
        let mut bottom = String::new();
        bottom.push(chars.bottom_left);
        bottom.extend(std::iter::repeat_n(chars.horizontal, outer - 2));
        bottom.push(chars.bottom_right);
        lines.push(StyledText::styled(bottom, self.border_style));
        lines
    }

    fn top_border(&self, outer: usize, chars: &BoxChars) -> StyledText {
        let span = outer - 2;
        let title = truncate(&self.title, span.saturating_sub(4));
        let block = if title.is_empty() {
            String::new()
        } else {
            format!(" {title} ")
        };
        let remaining = span.saturating_sub(block.width());
        let lead = match self.align {
            PanelAlign::Left => remaining.min(1),
            PanelAlign::Center => remaining.div_euclid(2),
            PanelAlign::Right => remaining.saturating_sub(1),
        };
        let head = format!("{}{}", chars.top_left, rule(chars.horizontal, lead));
        let tail = rule(chars.horizontal, remaining - lead);

        let mut line = StyledText::styled(head, self.border_style);
        line.push_str(&block, Style::new());
        line.push_str(&format!("{tail}{}", chars.top_right), self.border_style);
        line
    }

    fn table_lines(&self, rows: &[Row], inner: usize) -> Vec<StyledText> {
        let labels: Vec<StyledText> = rows.iter().map(label_cell).collect();
        let columns = fit_columns(rows, &labels, inner);
        tracing::trace!(
            panel = self.title.as_str(),
            label = columns.label,
            metavar = ?columns.metavar,
            help = columns.help,
            "panel column widths"
        );
        let mut lines = Vec::new();
        for (row, label) in rows.iter().zip(labels) {
            let label_lines = label.wrap(columns.label);
            let metavar_lines = columns
                .metavar
                .map(|width| row.metavar.wrap(width))
                .unwrap_or_default();
            let help_lines = row.help.wrap(columns.help);
            let height = label_lines
                .len()
                .max(metavar_lines.len())
                .max(help_lines.len());
            for index in 0..height {
                let mut line = cell(&label_lines, index, columns.label);
                if let Some(width) = columns.metavar {
                    line.push_str(&" ".repeat(COLUMN_GAP), Style::new());
                    line.append(cell(&metavar_lines, index, width));
                }
                line.push_str(&" ".repeat(COLUMN_GAP), Style::new());
                line.append(cell(&help_lines, index, columns.help));
                lines.push(line);
            }
        }
        lines
    }
}

fn label_cell(row: &Row) -> StyledText {
    let mut label = row.label.clone();
    if let Some(secondary) = &row.secondary_label {
        label.push_str("/", Style::new());
        label.append(secondary.clone());
    }
    label
}

fn rule(ch: char, count: usize) -> String {
    std::iter::repeat_n(ch, count).collect()
}

fn cell(lines: &[StyledText], index: usize, width: usize) -> StyledText {
    let mut out = lines.get(index).cloned().unwrap_or_default();
    out.pad_to(width);
    out
}

fn fit_columns(rows: &[Row], labels: &[StyledText], inner: usize) -> Columns {
    let mut label = labels
        .iter()
        .map(StyledText::width)
        .max()
        .unwrap_or(0)
        .max(1);
    let has_metavar = rows.iter().any(|row| !row.metavar.is_empty());
    let mut metavar = rows
        .iter()
        .map(|row| row.metavar.width())
        .max()
        .unwrap_or(0)
        .max(1);
    let cells = if has_metavar { 2 } else { 1 };
    let gaps = cells * COLUMN_GAP;
    let help_floor = MIN_HELP_WIDTH
        .max(inner.div_euclid(3))
        .min(inner.saturating_sub(gaps + 2));
    let budget = inner
        .saturating_sub(help_floor + gaps)
        .max(cells * MIN_CELL_WIDTH);

    if has_metavar {
        if label + metavar > budget {
            let half = budget.div_euclid(2);
            if metavar <= half {
                label = budget - metavar;
            } else if label <= half {
                metavar = budget - label;
            } else {
                label = half;
                metavar = budget - half;
            }
        }
    } else {
        label = label.min(budget);
    }

    let fixed = label + gaps + if has_metavar { metavar } else { 0 };
    Columns {
        label,
        metavar: has_metavar.then_some(metavar),
        help: inner.saturating_sub(fixed).max(MIN_CELL_WIDTH),
    }
}

fn truncate(title: &str, max: usize) -> String {
    if title.width() <= max {
        return title.to_owned();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in title.chars() {
        let cols = ch.width().unwrap_or(0);
        if used + cols + 1 > max {
            break;
        }
        out.push(ch);
        used += cols;
    }
    if max > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn row(label: &str, metavar: &str, help: &str) -> Row {
        Row {
            label: StyledText::plain(label),
            secondary_label: None,
            metavar: StyledText::plain(metavar),
            help: StyledText::plain(help),
        }
    }

    fn panel(title: &str, rows: Vec<Row>) -> Panel {
        Panel {
            title: title.to_owned(),
            body: PanelBody::Table(rows),
            border_style: Style::new(),
            align: PanelAlign::Left,
            box_style: BoxStyle::Rounded,
        }
    }

    fn text(lines: &[StyledText]) -> Vec<String> {
        lines.iter().map(StyledText::plain_text).collect()
    }

    #[fixture]
    fn rows() -> Vec<Row> {
        vec![
            row("-n, --name", "TEXT", "Your name [required]"),
            row("--force", "", "Overwrite files without asking"),
        ]
    }

    #[rstest]
    fn draws_a_rounded_box(rows: Vec<Row>) {
        let lines = text(&panel("Options", rows).render(40));
        assert_eq!(
            lines.first().map(String::as_str),
            Some("╭─ Options ────────────────────────────╮")
        );
        assert_eq!(
            lines.last().map(String::as_str),
            Some("╰──────────────────────────────────────╯")
        );
        let framed = |line: &String| line.starts_with("│ ") && line.ends_with(" │");
        assert!(lines.iter().skip(1).take(lines.len() - 2).all(framed));
    }

    #[rstest]
    #[case(80)]
    #[case(40)]
    #[case(20)]
    fn every_line_fills_the_width(rows: Vec<Row>, #[case] width: usize) {
        for line in panel("Options", rows.clone()).render(width) {
            assert_eq!(line.width(), width, "{:?}", line.plain_text());
        }
    }

    #[rstest]
    fn wide_glyphs_fit_shrunk_columns() {
        let rows = vec![row("--日本語日本語", "日本語日本語日本語", "日本語の説明です")];
        for width in 18..=40 {
            for line in panel("Options", rows.clone()).render(width) {
                assert_eq!(line.width(), width, "{:?}", line.plain_text());
            }
        }
    }

    #[rstest]
    fn columns_align_across_rows(rows: Vec<Row>) {
        let lines = text(&panel("Options", rows).render(60));
        let body: Vec<&String> = lines.iter().skip(1).take(2).collect();
        let help_start = |line: &str, needle: &str| line.find(needle).expect("help text present");
        let first = help_start(body.first().expect("row"), "Your");
        let second = help_start(body.get(1).expect("row"), "Overwrite");
        assert_eq!(first, second);
    }

    #[rstest]
    fn metavar_column_is_omitted_when_empty() {
        let rows = vec![row("sync", "", "Sync"), row("get", "", "Fetch")];
        let lines = text(&panel("Commands", rows).render(30));
        assert_eq!(
            lines.get(1).map(String::as_str),
            Some("│ sync  Sync                 │")
        );
    }

    #[rstest]
    fn long_help_wraps_under_its_column(rows: Vec<Row>) {
        let lines = text(&panel("Options", rows).render(36));
        let continuation = lines.get(2).expect("wrapped line");
        let indent = " ".repeat(18);
        let expected = format!("│ {indent}[required]");
        assert!(continuation.starts_with(&expected), "{continuation:?}");
    }

    #[rstest]
    #[case(PanelAlign::Left, "+- T ------+")]
    #[case(PanelAlign::Center, "+--- T ----+")]
    #[case(PanelAlign::Right, "+------ T -+")]
    fn aligns_titles(#[case] align: PanelAlign, #[case] expected: &str) {
        let mut boxed = panel("T", vec![row("a", "", "b")]);
        boxed.align = align;
        boxed.box_style = BoxStyle::Ascii;
        let lines = text(&boxed.render(12));
        assert_eq!(lines.first().map(String::as_str), Some(expected));
    }

    #[rstest]
    fn truncates_long_titles() {
        let lines = panel("A very long panel title indeed", vec![row("a", "", "b")]).render(20);
        let top = lines.first().expect("top border");
        assert_eq!(top.width(), 20);
        assert!(top.plain_text().contains('…'));
    }

    #[rstest]
    fn secondary_labels_follow_a_slash() {
        let mut toggle = row("--color", "", "Colour output");
        toggle.secondary_label = Some(StyledText::plain("--no-color"));
        let lines = text(&panel("Options", vec![toggle]).render(50));
        let first = lines.get(1).expect("row");
        assert!(first.contains("--color/--no-color"));
    }

    #[rstest]
    fn text_bodies_wrap() {
        let boxed = Panel {
            body: PanelBody::Text(StyledText::plain("something went badly wrong here")),
            ..panel("Error", Vec::new())
        };
        let lines = boxed.render(20);
        assert!(lines.len() > 3);
        assert!(lines.iter().all(|line| line.width() == 20));
    }

    #[rstest]
    fn assemble_names_untitled_groups() {
        let groups = vec![
            ResolvedGroup {
                name: Some("Basic".to_owned()),
                items: vec![row("a", "", "")],
            },
            ResolvedGroup {
                name: None,
                items: vec![row("b", "", "")],
            },
        ];
        let panels = assemble(
            groups,
            "Options",
            Style::new(),
            PanelAlign::Left,
            BoxStyle::Rounded,
        );
        let titles: Vec<_> = panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Basic", "Options"]);
    }
}
