//! Assembles the complete help screen for one command.
//!
//! [`compose`] is pure: it turns a descriptor, a configuration and a width
//! into a [`Document`] of styled lines. [`render`] resolves the width and the
//! colour choice and writes the document out.

use std::io::{self, Write};

use crate::config::StyleConfig;
use crate::descriptor::{CommandDescriptor, Param};
use crate::error::PanelHelpError;
use crate::groups::{ResolvedGroup, resolve};
use crate::output::{AnsiWriter, OutputWriter, PlainWriter, Stream, detect_width, writer_for};
use crate::panel::{self, Panel, PanelBody};
use crate::rows::{self, Item, Row, interpret_help};
use crate::style::Style;
use crate::text::{StyledText, UsageStyles, highlight_usage};

/// Width used when neither the configuration nor the terminal supplies one.
pub const DEFAULT_WIDTH: usize = 80;
/// Narrowest layout the composer will produce.
pub const MIN_WIDTH: usize = 20;

/// A finished help screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<StyledText>,
}

impl Document {
    /// The rendered lines, top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[StyledText] {
        &self.lines
    }

    /// Writes every line to `writer`.
    ///
    /// # Errors
    ///
    /// Propagates failures from the writer.
    pub fn write_to(&self, writer: &mut dyn OutputWriter) -> io::Result<()> {
        for line in &self.lines {
            writer.write_line(line)?;
        }
        Ok(())
    }

    /// The document without escape sequences.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        let mut buffer = Vec::new();
        self.fill(&mut PlainWriter::new(&mut buffer));
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// The document painted with ANSI escape sequences.
    #[must_use]
    pub fn to_ansi_string(&self) -> String {
        let mut buffer = Vec::new();
        self.fill(&mut AnsiWriter::new(&mut buffer));
        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn fill(&self, writer: &mut dyn OutputWriter) {
        // In-memory writes do not fail.
        if let Err(err) = self.write_to(writer) {
            tracing::debug!(error = %err, "in-memory write failed");
        }
    }

    fn push(&mut self, line: StyledText) {
        if line.is_empty() {
            self.blank();
            return;
        }
        let mut padded = StyledText::plain(" ");
        padded.append(line);
        self.lines.push(padded);
    }

    fn push_wrapped(&mut self, text: &StyledText, width: usize) {
        for line in text.wrap(content_width(width)) {
            self.push(line);
        }
    }

    fn push_panel(&mut self, panel: &Panel, width: usize) {
        for line in panel.render(content_width(width)) {
            self.push(line);
        }
    }

    fn blank(&mut self) {
        self.lines.push(StyledText::new());
    }
}

const fn content_width(width: usize) -> usize {
    width.saturating_sub(2)
}

/// Combines a configured width limit with the detected terminal width.
///
/// An unknown terminal counts as [`DEFAULT_WIDTH`] columns; a configured
/// limit caps whichever applies. The result is never below [`MIN_WIDTH`].
#[must_use]
pub fn effective_width(max_width: Option<usize>, terminal: Option<usize>) -> usize {
    let columns = terminal.unwrap_or_else(|| {
        tracing::debug!(
            fallback = DEFAULT_WIDTH,
            "terminal width unknown; using fallback"
        );
        DEFAULT_WIDTH
    });
    max_width
        .map_or(columns, |limit| limit.min(columns))
        .max(MIN_WIDTH)
}

/// Lays out the help screen for `command` at `columns` wide, never
/// narrower than [`MIN_WIDTH`].
///
/// # Errors
///
/// Returns [`PanelHelpError::Markup`] when markup is enabled and some help
/// text is malformed.
///
/// # Examples
///
/// ```
/// use panel_help::compose::compose;
/// use panel_help::config::StyleConfig;
/// use panel_help::descriptor::{CommandDescriptor, OptionDescriptor};
///
/// let cmd = CommandDescriptor::new("mytool")
///     .with_help("Does useful things.")
///     .with_param(OptionDescriptor::new("force", &["--force"]).with_help("Overwrite"));
/// let text = compose(&cmd, &StyleConfig::default(), 60)?.to_plain_string();
/// assert!(text.starts_with(" Usage: mytool [OPTIONS]"));
/// assert!(text.contains("╭─ Options "));
/// # Ok::<(), panel_help::PanelHelpError>(())
/// ```
pub fn compose(
    command: &CommandDescriptor,
    config: &StyleConfig,
    columns: usize,
) -> Result<Document, PanelHelpError> {
    let width = columns.max(MIN_WIDTH);
    let mut doc = Document::default();

    if let Some(header) = &config.strings.header_text {
        let text = interpret_help(header, config.styles.header_text, config)?;
        doc.push_wrapped(&text, width);
        doc.blank();
    }
    doc.push_wrapped(&usage_line(command, config), width);
    doc.blank();

    if let Some(description) = description(command, config)? {
        doc.push_wrapped(&description, width);
        doc.blank();
    }

    for panel in option_panels(command, config)? {
        doc.push_panel(&panel, width);
    }
    for panel in command_panels(command, config)? {
        doc.push_panel(&panel, width);
    }

    if let Some(epilog) = &command.epilog {
        doc.blank();
        let text = interpret_help(epilog, config.styles.epilog_text, config)?;
        doc.push_wrapped(&text, width);
    }
    if let Some(footer) = &config.strings.footer_text {
        doc.blank();
        let text = interpret_help(footer, config.styles.footer_text, config)?;
        doc.push_wrapped(&text, width);
    }
    tracing::debug!(
        command = command.path.as_str(),
        width,
        lines = doc.lines.len(),
        "composed help"
    );
    Ok(doc)
}

/// Lays out an error report: usage, a hint pointing at `--help`, the message
/// in an error panel, and the configured epilogue.
///
/// # Errors
///
/// Returns [`PanelHelpError::Markup`] when markup is enabled and the
/// epilogue is malformed.
pub fn compose_error(
    command: &CommandDescriptor,
    message: &str,
    config: &StyleConfig,
    columns: usize,
) -> Result<Document, PanelHelpError> {
    let width = columns.max(MIN_WIDTH);
    let strings = &config.strings;
    let styles = &config.styles;
    let mut doc = Document::default();

    doc.push_wrapped(&usage_line(command, config), width);
    let suggestion = strings.errors_suggestion.as_ref().map_or_else(
        || {
            let command_style = styles
                .errors_suggestion
                .combine(styles.errors_suggestion_command);
            let mut hint = StyledText::styled("Try ", styles.errors_suggestion);
            hint.push_str(&format!("'{} --help'", command.path), command_style);
            hint.push_str(" for help.", styles.errors_suggestion);
            hint
        },
        |custom| StyledText::styled(custom.clone(), styles.errors_suggestion),
    );
    doc.push_wrapped(&suggestion, width);
    doc.blank();

    let panel = Panel {
        title: strings.errors_panel_title.clone(),
        body: PanelBody::Text(StyledText::plain(message.trim())),
        border_style: styles.errors_panel_border,
        align: config.layout.errors_panel_align,
        box_style: config.layout.panel_box,
    };
    doc.push_panel(&panel, width);

    if let Some(epilogue) = &strings.errors_epilogue {
        let text = interpret_help(epilogue, Style::new(), config)?;
        doc.push_wrapped(&text, width);
    }
    Ok(doc)
}

/// Composes help for `command` and writes it to `out`, sized to the terminal
/// and coloured according to the configuration.
///
/// # Errors
///
/// Returns [`PanelHelpError::Markup`] for malformed markup and
/// [`PanelHelpError::Write`] when `out` fails.
pub fn render(
    command: &CommandDescriptor,
    config: &StyleConfig,
    out: &mut dyn Write,
) -> Result<(), PanelHelpError> {
    let width = effective_width(config.layout.max_width, detect_width());
    let doc = compose(command, config, width)?;
    emit(&doc, config, Stream::Stdout, out)
}

/// Composes an error report for `command` and writes it to `out`, which is
/// assumed to be standard error for colour detection.
///
/// # Errors
///
/// As for [`render`].
pub fn render_error(
    command: &CommandDescriptor,
    message: &str,
    config: &StyleConfig,
    out: &mut dyn Write,
) -> Result<(), PanelHelpError> {
    let width = effective_width(config.layout.max_width, detect_width());
    let doc = compose_error(command, message, config, width)?;
    emit(&doc, config, Stream::Stderr, out)
}

fn emit(
    doc: &Document,
    config: &StyleConfig,
    stream: Stream,
    out: &mut dyn Write,
) -> Result<(), PanelHelpError> {
    let color = config.layout.color.enabled_for(stream);
    doc.write_to(writer_for(out, color).as_mut())?;
    out.flush()?;
    Ok(())
}

fn usage_line(command: &CommandDescriptor, config: &StyleConfig) -> StyledText {
    let styles = &config.styles;
    let mut line = StyledText::styled(config.strings.usage_prefix.clone(), styles.usage);
    line.push_str(" ", Style::new());
    let rest = match command.usage.strip_prefix(command.path.as_str()) {
        Some(rest) => {
            line.push_atomic(&command.path, styles.usage_command);
            rest
        }
        None => command.usage.as_str(),
    };
    line.append(highlight_usage(
        rest,
        &UsageStyles {
            base: Style::new(),
            metavar: styles.metavar,
            option: styles.option,
            switch: styles.switch,
        },
    ));
    line
}

fn description(
    command: &CommandDescriptor,
    config: &StyleConfig,
) -> Result<Option<StyledText>, PanelHelpError> {
    let help = command.help.as_deref().map(str::trim).unwrap_or_default();
    if help.is_empty() {
        return Ok(None);
    }
    let styles = &config.styles;
    let (first, rest) = help.split_once("\n\n").unwrap_or((help, ""));
    let mut text = StyledText::new();
    if command.deprecated {
        text.push_atomic(&config.strings.deprecated, styles.deprecated);
        text.push_str(" ", Style::new());
    }
    let lead = interpret_help(first, styles.helptext_first_line, config)?;
    text.append(lead);
    if !rest.trim().is_empty() {
        let body = interpret_help(rest, styles.helptext, config)?;
        text.push_str("\n\n", Style::new());
        text.append(body);
    }
    Ok(Some(text))
}

fn option_panels(
    command: &CommandDescriptor,
    config: &StyleConfig,
) -> Result<Vec<Panel>, PanelHelpError> {
    let behaviour = &config.behaviour;
    let items: Vec<Item<'_>> = command
        .params
        .iter()
        .filter(|param| !param.is_hidden())
        .filter_map(|param| match param {
            Param::Argument(argument) => {
                behaviour.show_arguments.then_some(Item::Argument(argument))
            }
            Param::Option(option) => Some(Item::Option(option)),
        })
        .collect();

    let separate = !behaviour.group_arguments_with_options;
    let resolution = resolve(&command.path, &items, &config.option_groups);
    let (arguments, options): (Vec<Item<'_>>, Vec<Item<'_>>) = resolution
        .ungrouped
        .into_iter()
        .partition(|item| separate && matches!(item, Item::Argument(_)));

    let mut groups = Vec::new();
    if !arguments.is_empty() {
        groups.push(ResolvedGroup {
            name: Some(config.strings.arguments_panel_title.clone()),
            items: arguments,
        });
    }
    groups.extend(resolution.declared);
    if !options.is_empty() {
        groups.push(ResolvedGroup {
            name: None,
            items: options,
        });
    }

    Ok(panel::assemble(
        build_rows(groups, config)?,
        &config.strings.options_panel_title,
        config.styles.options_panel_border,
        config.layout.options_panel_align,
        config.layout.panel_box,
    ))
}

fn command_panels(
    command: &CommandDescriptor,
    config: &StyleConfig,
) -> Result<Vec<Panel>, PanelHelpError> {
    let items: Vec<Item<'_>> = command
        .subcommands
        .iter()
        .filter(|sub| !sub.hidden)
        .map(Item::Command)
        .collect();
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let resolution = resolve(&command.path, &items, &config.command_groups);
    Ok(panel::assemble(
        build_rows(resolution.into_groups(), config)?,
        &config.strings.commands_panel_title,
        config.styles.commands_panel_border,
        config.layout.commands_panel_align,
        config.layout.panel_box,
    ))
}

fn build_rows(
    groups: Vec<ResolvedGroup<Item<'_>>>,
    config: &StyleConfig,
) -> Result<Vec<ResolvedGroup<Row>>, PanelHelpError> {
    groups
        .into_iter()
        .map(|group| {
            let items = group
                .items
                .into_iter()
                .map(|item| rows::build(item, config))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ResolvedGroup {
                name: group.name,
                items,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ArgumentDescriptor, OptionDescriptor};
    use crate::groups::GroupSpec;
    use rstest::{fixture, rstest};

    #[fixture]
    fn mytool() -> CommandDescriptor {
        let name = OptionDescriptor::new("name", &["-n", "--name"]).with_metavar("TEXT");
        let sync = CommandDescriptor::new("sync").with_short_help("Synchronise");
        CommandDescriptor::new("mytool")
            .with_help("Does useful things.\n\nLonger explanation follows here.")
            .with_param(ArgumentDescriptor::new("path").with_help("Where to look"))
            .with_param(name)
            .with_param(OptionDescriptor::new("force", &["--force"]))
            .with_subcommand(sync)
    }

    fn titles(doc: &Document) -> Vec<String> {
        doc.lines()
            .iter()
            .map(StyledText::plain_text)
            .filter_map(|line| {
                let rest = line.trim_start().strip_prefix("╭─ ")?;
                rest.split_once(" ─").map(|(title, _)| title.to_owned())
            })
            .collect()
    }

    fn compose_default(command: &CommandDescriptor, width: usize) -> Document {
        let config = StyleConfig::default();
        compose(command, &config, width).expect("compose")
    }

    fn plain(doc: &Document) -> Vec<String> {
        doc.lines().iter().map(StyledText::plain_text).collect()
    }

    #[rstest]
    #[case(None, None, DEFAULT_WIDTH)]
    #[case(None, Some(120), 120)]
    #[case(Some(60), Some(120), 60)]
    #[case(Some(100), None, DEFAULT_WIDTH)]
    #[case(Some(60), None, 60)]
    #[case(Some(5), Some(120), MIN_WIDTH)]
    fn resolves_effective_width(
        #[case] max_width: Option<usize>,
        #[case] terminal: Option<usize>,
        #[case] expected: usize,
    ) {
        assert_eq!(effective_width(max_width, terminal), expected);
    }

    #[rstest]
    fn lays_out_usage_description_and_panels(mytool: CommandDescriptor) {
        let doc = compose_default(&mytool, 60);
        let lines = plain(&doc);
        let line = |index: usize| lines.get(index).map(String::as_str);
        assert_eq!(line(0), Some(" Usage: mytool [OPTIONS]"));
        assert_eq!(line(1), Some(""));
        assert_eq!(line(2), Some(" Does useful things."));
        assert_eq!(line(4), Some(" Longer explanation follows here."));
        assert_eq!(titles(&doc), ["Options", "Commands"]);
    }

    #[rstest]
    fn arguments_panel_is_opt_in(mytool: CommandDescriptor) {
        let mut config = StyleConfig::default();
        config.behaviour.show_arguments = true;
        let doc = compose(&mytool, &config, 60).expect("compose");
        assert_eq!(titles(&doc), ["Arguments", "Options", "Commands"]);

        config.behaviour.group_arguments_with_options = true;
        let merged = compose(&mytool, &config, 60).expect("compose");
        assert_eq!(titles(&merged), ["Options", "Commands"]);
        assert!(merged.to_plain_string().contains("PATH"));
    }

    #[rstest]
    fn hidden_items_never_produce_rows(mut mytool: CommandDescriptor) {
        let mut secret = OptionDescriptor::new("secret", &["--secret"]);
        secret.hidden = true;
        let mut internal = ArgumentDescriptor::new("internal");
        internal.hidden = true;
        let mut debug = CommandDescriptor::new("debug");
        debug.hidden = true;
        mytool = mytool
            .with_param(secret)
            .with_param(internal)
            .with_subcommand(debug);
        let mut config = StyleConfig::default();
        config.behaviour.show_arguments = true;

        let text = compose(&mytool, &config, 60)
            .expect("compose")
            .to_plain_string();
        assert!(!text.contains("--secret"), "{text}");
        assert!(!text.contains("INTERNAL"), "{text}");
        assert!(!text.contains("debug"), "{text}");
        assert!(text.contains("PATH") && text.contains("sync"), "{text}");
    }

    #[rstest]
    fn declared_groups_precede_the_default_panel(mytool: CommandDescriptor) {
        let mut config = StyleConfig::default();
        let basic = vec![GroupSpec::new("Basic", &["--name"])];
        config.option_groups.insert("mytool".to_owned(), basic);
        let doc = compose(&mytool, &config, 60).expect("compose");
        assert_eq!(titles(&doc), ["Basic", "Options", "Commands"]);
    }

    #[rstest]
    fn leaf_commands_have_no_commands_panel() {
        let quiet = OptionDescriptor::new("quiet", &["-q"]);
        let leaf = CommandDescriptor::new("leaf").with_param(quiet);
        let doc = compose_default(&leaf, 40);
        assert_eq!(titles(&doc), ["Options"]);
    }

    #[rstest]
    fn deprecated_commands_carry_the_prefix(mut mytool: CommandDescriptor) {
        mytool.deprecated = true;
        let text = compose_default(&mytool, 60).to_plain_string();
        assert!(text.contains(" (Deprecated) Does useful things."), "{text}");
    }

    #[rstest]
    fn header_epilog_and_footer_frame_the_panels(mut mytool: CommandDescriptor) {
        mytool.epilog = Some("See the manual.".to_owned());
        let mut config = StyleConfig::default();
        config.strings.header_text = Some("Acme tools".to_owned());
        config.strings.footer_text = Some("Report bugs upstream.".to_owned());
        let lines = plain(&compose(&mytool, &config, 60).expect("compose"));
        assert_eq!(lines.first().map(String::as_str), Some(" Acme tools"));
        let tail: Vec<&str> = lines.iter().rev().take(3).map(String::as_str).collect();
        assert_eq!(tail, [" Report bugs upstream.", "", " See the manual."]);
    }

    #[rstest]
    fn errors_render_in_their_own_panel(mytool: CommandDescriptor) {
        let message = "unexpected argument '--frob'";
        let doc = compose_error(&mytool, message, &StyleConfig::default(), 50).expect("compose");
        let text = doc.to_plain_string();
        assert!(text.contains(" Try 'mytool --help' for help."), "{text}");
        assert_eq!(titles(&doc), ["Error"]);
        assert!(text.contains(message));
    }

    #[rstest]
    fn ansi_output_differs_only_by_escapes(mytool: CommandDescriptor) {
        let doc = compose_default(&mytool, 60);
        let painted = doc.to_ansi_string();
        assert_eq!(console::strip_ansi_codes(&painted), doc.to_plain_string());
    }
}
