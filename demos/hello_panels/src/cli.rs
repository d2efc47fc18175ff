//! Command-line surface of the demo and the help styling that goes with it.
//!
//! The help configuration is layered: the panel groups below sit underneath
//! `panel_help`'s own layers, so a style file named by
//! [`CONFIG_PATH_VAR`] or `PANEL_HELP_*` variables can still override them.

use camino::Utf8Path;
use clap::{ArgAction, Args, Parser, Subcommand, value_parser};
use figment::providers::Serialized;
use panel_help::PanelHelpError;
use panel_help::config::StyleConfig;
use panel_help::descriptor::{Annotations, NumericRange};
use panel_help::groups::{GroupMap, GroupSpec};

/// Names a TOML file with help styling overrides.
pub const CONFIG_PATH_VAR: &str = "HELLO_PANELS_HELP_CONFIG";

/// Command name, also the root key of the panel groups.
pub const BIN_NAME: &str = "hello-panels";

/// Friendly greetings with panelled help.
#[derive(Debug, Parser)]
#[command(
    name = "hello-panels",
    bin_name = "hello-panels",
    version,
    about = "Friendly greeting demo showcasing panelled help.\n\n\
             Run a subcommand, or nothing at all for the default greeting.",
    after_help = "Set HELLO_PANELS_HELP_CONFIG to restyle this screen."
)]
pub struct HelloPanelsCli {
    /// Who to greet.
    #[arg(
        short = 'r',
        long = "recipient",
        value_name = "NAME",
        default_value = "World",
        env = "HELLO_PANELS_RECIPIENT"
    )]
    pub recipient: String,
    /// Opening word of the greeting.
    #[arg(
        short = 's',
        long = "salutation",
        value_name = "WORD",
        default_value = "Hello"
    )]
    pub salutation: String,
    /// Shout the greeting.
    #[arg(long = "is-excited", action = ArgAction::SetTrue, conflicts_with = "is_quiet")]
    pub is_excited: bool,
    /// Whisper the greeting.
    #[arg(long = "is-quiet", action = ArgAction::SetTrue)]
    pub is_quiet: bool,
    /// Selected workflow.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Workflows offered by the demo.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a greeting.
    Greet(GreetCommand),
    /// Say goodbye, optionally leaving a gift.
    TakeLeave(TakeLeaveCommand),
}

/// Options for `greet`.
#[derive(Debug, Clone, Default, Args)]
pub struct GreetCommand {
    /// Text closing the greeting.
    #[arg(long, value_name = "TEXT", default_value = "!")]
    pub punctuation: String,
    /// A line printed before the greeting.
    #[arg(long, value_name = "TEXT")]
    pub preamble: Option<String>,
}

/// Options for `take-leave`.
#[derive(Debug, Clone, Default, Args)]
pub struct TakeLeaveCommand {
    /// Parting words.
    #[arg(long, value_name = "TEXT", default_value = "Take care")]
    pub farewell: String,
    /// Something to leave behind.
    #[arg(long, value_name = "ITEM")]
    pub gift: Option<String>,
    /// Minutes until a reminder is due.
    #[arg(long, value_name = "MINUTES", value_parser = value_parser!(u16).range(1..=120))]
    pub reminder_minutes: Option<u16>,
}

/// Panel groups for the demo's options.
#[must_use]
pub fn option_groups() -> GroupMap {
    let root = vec![
        GroupSpec::new("Greeting", &["--recipient", "--salutation"]),
        GroupSpec::new("Delivery", &["--is-excited", "--is-quiet"]),
    ];
    let farewell = GroupSpec::new("Farewell", &["--farewell", "--gift", "--reminder-minutes"]);
    GroupMap::from([
        (BIN_NAME.to_owned(), root),
        (format!("{BIN_NAME} take-leave"), vec![farewell]),
    ])
}

/// Panel groups for the demo's subcommands.
#[must_use]
pub fn command_groups() -> GroupMap {
    let greetings = GroupSpec::new("Greetings", &["greet"]);
    GroupMap::from([(BIN_NAME.to_owned(), vec![greetings])])
}

/// Metadata `clap` cannot carry: the reminder range and the deprecated
/// quiet switch.
#[must_use]
pub fn annotations() -> Annotations {
    Annotations::new()
        .range("reminder_minutes", NumericRange::from_bounds(&(1..=120)))
        .deprecate_arg("is_quiet")
}

/// Loads the help styling: `panel_help`'s layers with the demo's groups
/// underneath any user-supplied groups.
///
/// # Errors
///
/// Returns [`PanelHelpError::Config`] when a layer cannot be extracted.
pub fn load_help_config(path: Option<&Utf8Path>) -> Result<StyleConfig, PanelHelpError> {
    let figment = StyleConfig::figment(path)
        .join(Serialized::default("option_groups", option_groups()))
        .join(Serialized::default("command_groups", command_groups()));
    Ok(figment.extract()?)
}
