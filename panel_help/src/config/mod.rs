//! Styles, strings, layout and behaviour settings for help rendering.
//!
//! Every section carries `#[serde(default)]`, so a configuration file only
//! needs to name the values it overrides. [`StyleConfig::load`] layers the
//! built-in defaults, an optional TOML file and the environment; see
//! [`shared`] for the process-wide instance.

mod load;
mod shared;

use console::Color;
use serde::{Deserialize, Serialize};

use crate::groups::GroupMap;
use crate::output::ColorChoice;
use crate::panel::{BoxStyle, PanelAlign};
use crate::style::Style;

pub use load::{ENV_PREFIX, TERMINAL_WIDTH_VAR};
pub use shared::{install, shared};

/// The complete set of rendering overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Named styles.
    pub styles: Styles,
    /// Fixed display strings and templates.
    pub strings: Strings,
    /// Width, alignment, borders and colour.
    pub layout: Layout,
    /// Feature switches.
    pub behaviour: Behaviour,
    /// Option groups keyed by command path.
    pub option_groups: GroupMap,
    /// Subcommand groups keyed by command path.
    pub command_groups: GroupMap,
}

/// Named styles used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
    /// Long option flags.
    pub option: Style,
    /// Positional argument labels.
    pub argument: Style,
    /// Short option flags.
    pub switch: Style,
    /// Subcommand names.
    pub command: Style,
    /// Metavar text.
    pub metavar: Style,
    /// Metavars appended to help text.
    pub metavar_append: Style,
    /// Brackets, bars and angle brackets around metavars.
    pub metavar_separator: Style,
    /// The usage prefix.
    pub usage: Style,
    /// The command path on the usage line.
    pub usage_command: Style,
    /// The deprecated prefix.
    pub deprecated: Style,
    /// First paragraph of a command description.
    pub helptext_first_line: Style,
    /// Remaining paragraphs of a command description.
    pub helptext: Style,
    /// Option and argument help text.
    pub option_help: Style,
    /// Default-value suffix.
    pub option_default: Style,
    /// Environment-variable decoration.
    pub option_envvar: Style,
    /// Numeric-range suffix.
    pub option_range: Style,
    /// Short required marker.
    pub required_short: Style,
    /// Long required marker.
    pub required_long: Style,
    /// Border of option and argument panels.
    pub options_panel_border: Style,
    /// Border of command panels.
    pub commands_panel_border: Style,
    /// Border of the error panel.
    pub errors_panel_border: Style,
    /// The "Try ... for help." line under an error usage.
    pub errors_suggestion: Style,
    /// The command inside the error suggestion.
    pub errors_suggestion_command: Style,
    /// Header text above the usage line.
    pub header_text: Style,
    /// Epilog text below the panels.
    pub epilog_text: Style,
    /// Footer text at the very end.
    pub footer_text: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let none = Style::new();
        Self {
            option: none.bold().fg(Color::Cyan),
            argument: none.bold().fg(Color::Cyan),
            switch: none.bold().fg(Color::Green),
            command: none.bold().fg(Color::Cyan),
            metavar: none.bold().fg(Color::Yellow),
            metavar_append: none.dim().fg(Color::Yellow),
            metavar_separator: none.dim(),
            usage: none.fg(Color::Yellow),
            usage_command: none.bold(),
            deprecated: none.fg(Color::Red),
            helptext_first_line: none,
            helptext: none.dim(),
            option_help: none,
            option_default: none.dim(),
            option_envvar: none.dim().fg(Color::Yellow),
            option_range: none.dim(),
            required_short: none.fg(Color::Red),
            required_long: none.dim().fg(Color::Red),
            options_panel_border: none.dim(),
            commands_panel_border: none.dim(),
            errors_panel_border: none.fg(Color::Red),
            errors_suggestion: none.dim(),
            errors_suggestion_command: none.fg(Color::Blue),
            header_text: none,
            epilog_text: none,
            footer_text: none,
        }
    }
}

/// Display strings. Templates substitute their value for the first `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strings {
    /// Title of the positional-argument panel.
    pub arguments_panel_title: String,
    /// Title of the implicit option panel.
    pub options_panel_title: String,
    /// Title of the implicit command panel.
    pub commands_panel_title: String,
    /// Title of the error panel.
    pub errors_panel_title: String,
    /// Prefix marking deprecated items.
    pub deprecated: String,
    /// Default-value suffix.
    pub default_template: String,
    /// Environment-variable decoration.
    pub envvar_template: String,
    /// Numeric-range suffix.
    pub range_template: String,
    /// Metavar appended to help text.
    pub append_metavar_template: String,
    /// Short required marker.
    pub required_short: String,
    /// Long required marker.
    pub required_long: String,
    /// Separator between an option's flag forms.
    pub flag_separator: String,
    /// Prefix of the usage line.
    pub usage_prefix: String,
    /// Text printed above the usage line.
    pub header_text: Option<String>,
    /// Text printed after everything else.
    pub footer_text: Option<String>,
    /// Suggestion printed under an error usage line; `{}` is the help command.
    pub errors_suggestion: Option<String>,
    /// Text printed after the error panel.
    pub errors_epilogue: Option<String>,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            arguments_panel_title: "Arguments".to_owned(),
            options_panel_title: "Options".to_owned(),
            commands_panel_title: "Commands".to_owned(),
            errors_panel_title: "Error".to_owned(),
            deprecated: "(Deprecated)".to_owned(),
            default_template: "[default: {}]".to_owned(),
            envvar_template: "[env var: {}]".to_owned(),
            range_template: "[{}]".to_owned(),
            append_metavar_template: "({})".to_owned(),
            required_short: "*".to_owned(),
            required_long: "[required]".to_owned(),
            flag_separator: ", ".to_owned(),
            usage_prefix: "Usage:".to_owned(),
            header_text: None,
            footer_text: None,
            errors_suggestion: None,
            errors_epilogue: None,
        }
    }
}

/// Substitutes `value` for the first `{}` in `template`.
///
/// A template without a placeholder is returned unchanged.
#[must_use]
pub fn fill_template(template: &str, value: &str) -> String {
    template.replacen("{}", value, 1)
}

/// Width, alignment, border and colour settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Upper bound on the output width. Without it the terminal width is
    /// used, or 80 columns when that is unknown.
    pub max_width: Option<usize>,
    /// Title alignment of option and argument panels.
    pub options_panel_align: PanelAlign,
    /// Title alignment of command panels.
    pub commands_panel_align: PanelAlign,
    /// Title alignment of the error panel.
    pub errors_panel_align: PanelAlign,
    /// Border drawing characters.
    pub panel_box: BoxStyle,
    /// Whether escape sequences are written.
    pub color: ColorChoice,
}

/// Which required marker rows carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredMarker {
    /// The short marker, `*` by default.
    Short,
    /// The long marker, `[required]` by default.
    #[default]
    Long,
}

/// Feature switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent, user-facing switch"
)]
pub struct Behaviour {
    /// Render positional arguments at all.
    pub show_arguments: bool,
    /// Put positional arguments in the option panels instead of their own.
    pub group_arguments_with_options: bool,
    /// Give metavars their own column.
    pub show_metavars_column: bool,
    /// Append metavars to the help text.
    pub append_metavars_help: bool,
    /// Put the environment variable before the help text.
    pub option_envvar_first: bool,
    /// Interpret help text as Markdown. Takes precedence over `use_markup`.
    pub use_markdown: bool,
    /// Interpret help text as bracketed markup.
    pub use_markup: bool,
    /// Which required marker to draw.
    pub required_marker: RequiredMarker,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            show_arguments: false,
            group_arguments_with_options: false,
            show_metavars_column: true,
            append_metavars_help: false,
            option_envvar_first: false,
            use_markdown: false,
            use_markup: false,
            required_marker: RequiredMarker::Long,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Figment;
    use figment::providers::{Format, Toml};
    use rstest::rstest;

    #[rstest]
    #[case("[default: {}]", "x", "[default: x]")]
    #[case("{} is the value", "7", "7 is the value")]
    #[case("fixed", "ignored", "fixed")]
    fn fills_the_first_placeholder(
        #[case] template: &str,
        #[case] value: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(fill_template(template, value), expected);
    }

    #[rstest]
    fn default_styles_match_the_documented_table() {
        let styles = Styles::default();
        assert_eq!(styles.option.to_string(), "bold cyan");
        assert_eq!(styles.switch.to_string(), "bold green");
        assert_eq!(styles.metavar_append.to_string(), "dim yellow");
        assert_eq!(styles.required_long.to_string(), "dim red");
        assert!(styles.helptext_first_line.is_plain());
    }

    #[rstest]
    fn partial_documents_keep_defaults() {
        let config: StyleConfig = Figment::from(Toml::string(
            "[styles]\noption = \"bold red\"\n\n[behaviour]\nshow_arguments = true\n",
        ))
        .extract()
        .expect("config extracts");
        assert_eq!(config.styles.option.to_string(), "bold red");
        assert_eq!(config.styles.switch, Styles::default().switch);
        assert!(config.behaviour.show_arguments);
        assert!(config.behaviour.show_metavars_column);
        assert_eq!(config.strings, Strings::default());
    }
}
