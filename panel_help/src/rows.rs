//! One table row per option, argument or subcommand.

use crate::config::{RequiredMarker, StyleConfig, fill_template};
use crate::descriptor::{ArgumentDescriptor, CommandDescriptor, NumericRange, OptionDescriptor};
use crate::error::PanelHelpError;
use crate::groups::Identified;
use crate::style::Style;
use crate::text::{StyledText, from_markdown, highlight_options, parse_markup};

/// Something that renders as a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
    /// An option.
    Option(&'a OptionDescriptor),
    /// A positional argument.
    Argument(&'a ArgumentDescriptor),
    /// A subcommand.
    Command(&'a CommandDescriptor),
}

impl Identified for Item<'_> {
    fn identifiers(&self) -> Vec<&str> {
        match self {
            Self::Option(option) => option.identifiers(),
            Self::Argument(argument) => argument.identifiers(),
            Self::Command(command) => command.identifiers(),
        }
    }
}

/// The cells of one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Flags, argument name or command name.
    pub label: StyledText,
    /// Negating flag forms, drawn after the label as `label/secondary`.
    pub secondary_label: Option<StyledText>,
    /// Value placeholder; empty when there is none.
    pub metavar: StyledText,
    /// Help text with its decorations.
    pub help: StyledText,
}

/// Builds the row for `item`.
///
/// # Errors
///
/// Returns [`PanelHelpError::Markup`] when markup is enabled and the help
/// text is malformed.
pub fn build(item: Item<'_>, config: &StyleConfig) -> Result<Row, PanelHelpError> {
    match item {
        Item::Option(option) => option_row(option, config),
        Item::Argument(argument) => argument_row(argument, config),
        Item::Command(command) => command_row(command, config),
    }
}

fn option_row(option: &OptionDescriptor, config: &StyleConfig) -> Result<Row, PanelHelpError> {
    let styles = &config.styles;
    let metavar_text = option.takes_value.then(|| option_metavar(option));
    let (label, metavar) = if option.flags.is_empty() {
        let name = metavar_text
            .clone()
            .unwrap_or_else(|| option.id.to_uppercase());
        (StyledText::styled(name, styles.argument), StyledText::new())
    } else {
        let metavar = metavar_text
            .as_deref()
            .filter(|_| config.behaviour.show_metavars_column)
            .map(|text| styled_metavar(text, config))
            .unwrap_or_default();
        (flag_label(&option.flags, config), metavar)
    };
    let secondary_label = (!option.secondary_flags.is_empty())
        .then(|| flag_label(&option.secondary_flags, config));

    let append = config.behaviour.append_metavars_help && !option.flags.is_empty();
    let appended = metavar_text.as_deref().filter(|_| append);
    let help = Decorations {
        deprecated: option.deprecated,
        envvar: option.envvar.as_deref().filter(|_| option.show_envvar),
        help: option.help.as_deref(),
        appended_metavar: appended,
        range: option.range.as_ref(),
        default: option.default.as_deref(),
        required: option.required,
    }
    .render(config)?;
    Ok(Row {
        label,
        secondary_label,
        metavar,
        help,
    })
}

fn argument_row(
    argument: &ArgumentDescriptor,
    config: &StyleConfig,
) -> Result<Row, PanelHelpError> {
    let mut name = argument.metavar.clone();
    if argument.variadic {
        name.push_str("...");
    }
    let help = Decorations {
        deprecated: argument.deprecated,
        envvar: argument.envvar.as_deref(),
        help: argument.help.as_deref(),
        appended_metavar: None,
        range: argument.range.as_ref(),
        default: argument.default.as_deref(),
        required: argument.required,
    }
    .render(config)?;
    Ok(Row {
        label: StyledText::styled(name, config.styles.argument),
        secondary_label: None,
        metavar: StyledText::new(),
        help,
    })
}

fn command_row(command: &CommandDescriptor, config: &StyleConfig) -> Result<Row, PanelHelpError> {
    let summary = command
        .short_help
        .as_deref()
        .or(command.help.as_deref())
        .and_then(first_paragraph);
    let help = Decorations {
        deprecated: command.deprecated,
        help: summary,
        ..Decorations::default()
    }
    .render(config)?;
    Ok(Row {
        label: StyledText::styled(command.name.clone(), config.styles.command),
        secondary_label: None,
        metavar: StyledText::new(),
        help,
    })
}

#[derive(Default)]
struct Decorations<'a> {
    deprecated: bool,
    envvar: Option<&'a str>,
    help: Option<&'a str>,
    appended_metavar: Option<&'a str>,
    range: Option<&'a NumericRange>,
    default: Option<&'a str>,
    required: bool,
}

impl Decorations<'_> {
    fn render(&self, config: &StyleConfig) -> Result<StyledText, PanelHelpError> {
        let styles = &config.styles;
        let strings = &config.strings;
        let envvar_first = config.behaviour.option_envvar_first;
        let mut parts: Vec<StyledText> = Vec::new();

        if self.deprecated {
            parts.push(atomic(&strings.deprecated, styles.deprecated));
        }
        let envvar = self
            .envvar
            .map(|name| fill_template(&strings.envvar_template, name))
            .map(|text| atomic(&text, styles.option_envvar));
        if envvar_first && let Some(decoration) = envvar.clone() {
            parts.push(decoration);
        }
        if let Some(text) = self.help {
            let interpreted = interpret_help(text, styles.option_help, config)?;
            if !interpreted.is_empty() {
                parts.push(interpreted);
            }
        }
        if let Some(metavar) = self.appended_metavar {
            parts.push(atomic(
                &fill_template(&strings.append_metavar_template, metavar),
                styles.metavar_append,
            ));
        }
        if !envvar_first && let Some(decoration) = envvar {
            parts.push(decoration);
        }
        if let Some(described) = self.range.and_then(NumericRange::describe) {
            let text = fill_template(&strings.range_template, &described);
            parts.push(atomic(&text, styles.option_range));
        }
        if let Some(default) = self.default {
            let text = fill_template(&strings.default_template, default);
            parts.push(atomic(&text, styles.option_default));
        }
        if self.required {
            parts.push(match config.behaviour.required_marker {
                RequiredMarker::Short => atomic(&strings.required_short, styles.required_short),
                RequiredMarker::Long => atomic(&strings.required_long, styles.required_long),
            });
        }

        let mut out = StyledText::new();
        for (index, part) in parts.into_iter().enumerate() {
            if index > 0 {
                out.push_str(" ", Style::new());
            }
            out.append(part);
        }
        Ok(out)
    }
}

fn atomic(text: &str, style: Style) -> StyledText {
    let mut out = StyledText::new();
    out.push_atomic(text, style);
    out
}

/// Interprets help text as Markdown, markup or literal text per
/// configuration, drawn over `base`.
///
/// Markdown is rendered as-is. Markup and literal text are reflowed first:
/// paragraphs are separated by blank lines and the lines of a paragraph are
/// joined with spaces unless the paragraph starts with `\x08`. Option
/// mentions are then highlighted.
pub(crate) fn interpret_help(
    text: &str,
    base: Style,
    config: &StyleConfig,
) -> Result<StyledText, PanelHelpError> {
    let behaviour = &config.behaviour;
    if behaviour.use_markdown {
        return Ok(from_markdown(text, base));
    }
    let reflowed = reflow(text).join("\n\n");
    let styled = if behaviour.use_markup {
        parse_markup(&reflowed, base)?
    } else {
        StyledText::styled(reflowed, base)
    };
    let styles = &config.styles;
    Ok(highlight_options(&styled, styles.option, styles.switch))
}

/// Splits `text` into paragraphs, unwrapping each unless it starts with the
/// `\x08` no-rewrap marker.
pub(crate) fn reflow(text: &str) -> Vec<String> {
    text.trim()
        .split("\n\n")
        .map(|paragraph| paragraph.trim_matches('\n'))
        .map(|paragraph| {
            paragraph.strip_prefix('\u{8}').map_or_else(
                || {
                    paragraph
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ")
                },
                |verbatim| verbatim.trim_start_matches('\n').to_owned(),
            )
        })
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}

fn first_paragraph(text: &str) -> Option<&str> {
    text.trim()
        .split("\n\n")
        .next()
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
}

fn option_metavar(option: &OptionDescriptor) -> String {
    if let Some(metavar) = &option.metavar {
        return metavar.clone();
    }
    if option.possible_values.is_empty() {
        option.id.to_uppercase()
    } else {
        format!("[{}]", option.possible_values.join("|"))
    }
}

fn styled_metavar(text: &str, config: &StyleConfig) -> StyledText {
    let mut out = StyledText::new();
    let mut buf = [0_u8; 4];
    for ch in text.chars() {
        let style = if matches!(ch, '[' | ']' | '|' | '<' | '>') {
            config.styles.metavar_separator
        } else {
            config.styles.metavar
        };
        out.push_str(ch.encode_utf8(&mut buf), style);
    }
    out
}

fn flag_label(flags: &[String], config: &StyleConfig) -> StyledText {
    let (shorts, longs): (Vec<&String>, Vec<&String>) =
        flags.iter().partition(|flag| !flag.starts_with("--"));
    let mut out = StyledText::new();
    for (index, flag) in shorts.into_iter().chain(longs).enumerate() {
        if index > 0 {
            out.push_str(&config.strings.flag_separator, Style::new());
        }
        let style = if flag.starts_with("--") {
            config.styles.option
        } else {
            config.styles.switch
        };
        out.push_str(flag, style);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> StyleConfig {
        StyleConfig::default()
    }

    fn help_of(item: Item<'_>, config: &StyleConfig) -> String {
        build(item, config).expect("row").help.plain_text()
    }

    #[rstest]
    fn required_option_without_default(config: StyleConfig) {
        let mut option = OptionDescriptor::new("name", &["--name"])
            .with_metavar("TEXT")
            .with_help("Your name");
        option.required = true;
        let row = build(Item::Option(&option), &config).expect("row");
        assert_eq!(row.label.plain_text(), "--name");
        assert_eq!(row.metavar.plain_text(), "TEXT");
        assert_eq!(row.help.plain_text(), "Your name [required]");
    }

    #[rstest]
    fn optional_option_with_default(config: StyleConfig) {
        let option = OptionDescriptor::new("name", &["--name"])
            .with_metavar("TEXT")
            .with_help("Your name")
            .with_default("x");
        assert_eq!(
            help_of(Item::Option(&option), &config),
            "Your name [default: x]"
        );
    }

    #[rstest]
    fn decorations_follow_the_fixed_order(mut config: StyleConfig) {
        config.behaviour.append_metavars_help = true;
        config.behaviour.required_marker = RequiredMarker::Short;
        let mut option = OptionDescriptor::new("jobs", &["-j", "--jobs"])
            .with_metavar("N")
            .with_help("Worker count")
            .with_default("4")
            .with_envvar("JOBS");
        option.deprecated = true;
        option.required = true;
        option.range = Some(NumericRange::from_bounds(&(1..=16)));
        assert_eq!(
            help_of(Item::Option(&option), &config),
            "(Deprecated) Worker count (N) [env var: JOBS] [1<=x<=16] [default: 4] *"
        );

        config.behaviour.option_envvar_first = true;
        assert_eq!(
            help_of(Item::Option(&option), &config),
            "(Deprecated) [env var: JOBS] Worker count (N) [1<=x<=16] [default: 4] *"
        );
    }

    #[rstest]
    fn decorations_are_atomic(config: StyleConfig) {
        let option = OptionDescriptor::new("name", &["--name"])
            .with_metavar("TEXT")
            .with_default("two words");
        let row = build(Item::Option(&option), &config).expect("row");
        let wanted = "[default: two words]";
        let spans = row.help.spans();
        assert!(spans.iter().any(|span| span.atomic && span.text == wanted));
    }

    #[rstest]
    fn short_flags_come_first(config: StyleConfig) {
        let option = OptionDescriptor::new("verbose", &["--verbose", "-v"]);
        let row = build(Item::Option(&option), &config).expect("row");
        assert_eq!(row.label.plain_text(), "-v, --verbose");
        let first = row.label.spans().first().expect("span");
        assert_eq!(first.style, config.styles.switch);
    }

    #[rstest]
    #[case(None, &[], "NAME")]
    #[case(Some("FILE"), &[], "FILE")]
    #[case(None, &["fast", "slow"], "[fast|slow]")]
    fn metavar_fallbacks(
        config: StyleConfig,
        #[case] declared: Option<&str>,
        #[case] choices: &[&str],
        #[case] expected: &str,
    ) {
        let mut option = OptionDescriptor::new("name", &["--name"]);
        option.takes_value = true;
        option.metavar = declared.map(ToOwned::to_owned);
        option.possible_values = choices.iter().map(|&choice| choice.to_owned()).collect();
        let row = build(Item::Option(&option), &config).expect("row");
        assert_eq!(row.metavar.plain_text(), expected);
    }

    #[rstest]
    fn metavar_separators_use_their_own_style(config: StyleConfig) {
        let mut option = OptionDescriptor::new("mode", &["--mode"]);
        option.takes_value = true;
        option.possible_values = vec!["a".to_owned(), "b".to_owned()];
        let row = build(Item::Option(&option), &config).expect("row");
        let spans = row.metavar.spans();
        let bar = spans
            .iter()
            .find(|span| span.text.contains('|'))
            .expect("bar");
        assert_eq!(bar.style, config.styles.metavar_separator);
    }

    #[rstest]
    fn flagless_option_and_argument_use_metavar_label(config: StyleConfig) {
        let mut option = OptionDescriptor::new("target", &[]);
        option.takes_value = true;
        let row = build(Item::Option(&option), &config).expect("row");
        assert_eq!(row.label.plain_text(), "TARGET");
        assert!(row.metavar.is_empty());

        let mut argument = ArgumentDescriptor::new("files");
        argument.variadic = true;
        let arg_row = build(Item::Argument(&argument), &config).expect("row");
        assert_eq!(arg_row.label.plain_text(), "FILES...");
    }

    #[rstest]
    fn flags_carry_no_metavar(config: StyleConfig) {
        let option = OptionDescriptor::new("force", &["--force"]).with_help("Overwrite");
        let row = build(Item::Option(&option), &config).expect("row");
        assert!(row.metavar.is_empty());
    }

    #[rstest]
    fn hidden_metavar_column(mut config: StyleConfig) {
        config.behaviour.show_metavars_column = false;
        let option = OptionDescriptor::new("name", &["--name"]).with_metavar("TEXT");
        let row = build(Item::Option(&option), &config).expect("row");
        assert!(row.metavar.is_empty());
    }

    #[rstest]
    fn commands_show_first_paragraph_only(config: StyleConfig) {
        let mut command = CommandDescriptor::new("sync")
            .with_help("Sync files.\n\nLong details here.");
        command.deprecated = true;
        let row = build(Item::Command(&command), &config).expect("row");
        assert_eq!(row.label.plain_text(), "sync");
        assert_eq!(row.help.plain_text(), "(Deprecated) Sync files.");
    }

    #[rstest]
    fn literal_help_is_never_interpreted(config: StyleConfig) {
        let option = OptionDescriptor::new("x", &["-x"]).with_help("[bold]not bold[/]");
        let row = build(Item::Option(&option), &config).expect("row");
        assert_eq!(row.help.plain_text(), "[bold]not bold[/]");
        assert!(row.help.spans().iter().all(|span| !span.style.is_bold()));
    }

    #[rstest]
    fn markup_help_is_parsed_and_errors_surface(mut config: StyleConfig) {
        config.behaviour.use_markup = true;
        let good = OptionDescriptor::new("x", &["-x"]).with_help("[italic]soft[/]");
        let row = build(Item::Option(&good), &config).expect("row");
        assert_eq!(row.help.plain_text(), "soft");

        let bad = OptionDescriptor::new("y", &["-y"]).with_help("oops[/]");
        let err = build(Item::Option(&bad), &config).expect_err("markup error");
        assert!(matches!(err, PanelHelpError::Markup { .. }));
    }

    #[rstest]
    fn markdown_help_is_converted(mut config: StyleConfig) {
        config.behaviour.use_markdown = true;
        let option = OptionDescriptor::new("x", &["-x"]).with_help("Use **care**");
        let row = build(Item::Option(&option), &config).expect("row");
        assert_eq!(row.help.plain_text(), "Use care");
        let care = row.help.spans().iter().find(|span| span.text == "care");
        assert!(care.is_some_and(|span| span.style.is_bold()));
    }

    #[rstest]
    #[case("one\ntwo", &["one two"])]
    #[case("one\n\ntwo\nthree", &["one", "two three"])]
    #[case("\u{8}\nkeep\n  lines", &["keep\n  lines"])]
    #[case("  ", &[])]
    fn reflows_paragraphs(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(reflow(input), expected);
    }
}
