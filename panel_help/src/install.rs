//! Hooks the panel renderer into `clap` parsing.
//!
//! `clap` reports `--help`, `--version` and usage mistakes as errors.
//! [`parse_or_render`] intercepts those errors: help requests are drawn as
//! panels for the subcommand the user invoked, version text is passed
//! through untouched, and genuine errors are drawn as an error panel.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::error::{Error as ClapError, ErrorKind};
use clap::{ArgMatches, Command};

use crate::compose;
use crate::config::{self, StyleConfig};
use crate::descriptor::{Annotations, CommandDescriptor};
use crate::error::PanelHelpError;

/// Something that can draw help and error screens.
pub trait HelpRenderer {
    /// Describes a `clap` command tree.
    fn describe(&self, command: &Command) -> CommandDescriptor;

    /// Writes the help screen for `command`.
    ///
    /// # Errors
    ///
    /// Returns an error when composition or writing fails.
    fn render_help(
        &self,
        command: &CommandDescriptor,
        out: &mut dyn Write,
    ) -> Result<(), PanelHelpError>;

    /// Writes an error report for `command`.
    ///
    /// # Errors
    ///
    /// Returns an error when composition or writing fails.
    fn render_error(
        &self,
        command: &CommandDescriptor,
        message: &str,
        out: &mut dyn Write,
    ) -> Result<(), PanelHelpError>;
}

/// The panelled renderer.
#[derive(Debug, Clone)]
pub struct PanelRenderer {
    config: Arc<StyleConfig>,
    annotations: Annotations,
}

impl PanelRenderer {
    /// A renderer using `config`.
    #[must_use]
    pub const fn new(config: Arc<StyleConfig>) -> Self {
        Self {
            config,
            annotations: Annotations::new(),
        }
    }

    /// A renderer using a snapshot of the process-wide configuration.
    #[must_use]
    pub fn from_shared() -> Self {
        Self::new(config::shared())
    }

    /// Attaches metadata `clap` cannot express.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &StyleConfig {
        &self.config
    }
}

impl Default for PanelRenderer {
    fn default() -> Self {
        Self::from_shared()
    }
}

impl HelpRenderer for PanelRenderer {
    fn describe(&self, command: &Command) -> CommandDescriptor {
        CommandDescriptor::from_clap_with(command, &self.annotations)
    }

    fn render_help(
        &self,
        command: &CommandDescriptor,
        out: &mut dyn Write,
    ) -> Result<(), PanelHelpError> {
        compose::render(command, &self.config, out)
    }

    fn render_error(
        &self,
        command: &CommandDescriptor,
        message: &str,
        out: &mut dyn Write,
    ) -> Result<(), PanelHelpError> {
        compose::render_error(command, message, &self.config, out)
    }
}

/// What [`parse_or_render`] did.
#[derive(Debug)]
pub enum ParseOutcome {
    /// Parsing succeeded.
    Matches(ArgMatches),
    /// Help, version or an error report was written; the process should exit
    /// with this code.
    Rendered {
        /// Exit status matching `clap`'s own.
        exit_code: i32,
    },
}

/// Parses `args` with `command`, drawing help and errors with `renderer` on
/// the standard streams.
///
/// # Errors
///
/// Returns an error when a help or error screen cannot be composed or
/// written.
pub fn parse_or_render<I, T>(
    command: &Command,
    args: I,
    renderer: &dyn HelpRenderer,
) -> Result<ParseOutcome, PanelHelpError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let (mut out, mut err) = (io::stdout().lock(), io::stderr().lock());
    parse_or_render_to(command, args, renderer, &mut out, &mut err)
}

/// As [`parse_or_render`], writing help and version text to `out` and error
/// reports to `err`.
///
/// # Errors
///
/// Returns an error when a help or error screen cannot be composed or
/// written.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use panel_help::config::StyleConfig;
/// use panel_help::install::{PanelRenderer, ParseOutcome, parse_or_render_to};
///
/// let cmd = clap::Command::new("tool").arg(clap::Arg::new("quiet").short('q').action(clap::ArgAction::SetTrue));
/// let renderer = PanelRenderer::new(Arc::new(StyleConfig::default()));
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let outcome = parse_or_render_to(&cmd, ["tool", "--help"], &renderer, &mut out, &mut err)?;
/// assert!(matches!(outcome, ParseOutcome::Rendered { exit_code: 0 }));
/// assert!(String::from_utf8_lossy(&out).contains("Usage:"));
/// # Ok::<(), panel_help::PanelHelpError>(())
/// ```
pub fn parse_or_render_to<I, T>(
    command: &Command,
    args: I,
    renderer: &dyn HelpRenderer,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<ParseOutcome, PanelHelpError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let error = match command.clone().try_get_matches_from(&argv) {
        Ok(matches) => return Ok(ParseOutcome::Matches(matches)),
        Err(error) => error,
    };
    let exit_code = error.exit_code();

    if error.kind() == ErrorKind::DisplayVersion {
        write!(out, "{}", error.render())?;
        out.flush()?;
        return Ok(ParseOutcome::Rendered { exit_code });
    }

    let words: Vec<String> = argv
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let root = renderer.describe(command);
    let invoked = root.find_invoked(&words);
    tracing::debug!(
        command = invoked.path.as_str(),
        kind = ?error.kind(),
        "intercepted clap error"
    );

    if matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        renderer.render_help(invoked, out)?;
    } else {
        renderer.render_error(invoked, &error_message(&error), err)?;
    }
    Ok(ParseOutcome::Rendered { exit_code })
}

/// The message part of a `clap` error, without the `error:` prefix, the
/// usage block or the closing `--help` hint.
fn error_message(error: &ClapError) -> String {
    let rendered = error.render().to_string();
    let head = rendered
        .split_once("\n\nUsage:")
        .map_or(rendered.as_str(), |(message, _)| message);
    let kept: Vec<&str> = head
        .lines()
        .filter(|line| !line.starts_with("For more information"))
        .collect();
    let joined = kept.join("\n");
    joined
        .trim()
        .strip_prefix("error: ")
        .unwrap_or_else(|| joined.trim())
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction};
    use rstest::{fixture, rstest};

    use crate::output::ColorChoice;

    #[fixture]
    fn mytool() -> Command {
        Command::new("mytool")
            .version("1.2.3")
            .about("Does useful things")
            .arg(
                Arg::new("force")
                    .long("force")
                    .action(ArgAction::SetTrue)
                    .help("Overwrite"),
            )
            .arg(
                Arg::new("profile")
                    .short('p')
                    .long("profile")
                    .help("Settings profile"),
            )
            .subcommand(
                Command::new("sync")
                    .about("Synchronise")
                    .arg(
                        Arg::new("dry")
                            .long("dry-run")
                            .action(ArgAction::SetTrue)
                            .help("Only report"),
                    ),
            )
    }

    #[fixture]
    fn renderer() -> PanelRenderer {
        let mut config = StyleConfig::default();
        config.layout.color = ColorChoice::Never;
        config.layout.max_width = Some(60);
        PanelRenderer::new(Arc::new(config))
    }

    struct Captured {
        outcome: ParseOutcome,
        out: String,
        err: String,
    }

    fn run(command: &Command, renderer: &PanelRenderer, args: &[&str]) -> Captured {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let words = args.iter().copied();
        let outcome = parse_or_render_to(command, words, renderer, &mut out, &mut err)
            .expect("render succeeds");
        Captured {
            outcome,
            out: String::from_utf8(out).expect("utf-8"),
            err: String::from_utf8(err).expect("utf-8"),
        }
    }

    fn exit_code(captured: &Captured) -> Option<i32> {
        match captured.outcome {
            ParseOutcome::Rendered { exit_code } => Some(exit_code),
            ParseOutcome::Matches(_) => None,
        }
    }

    #[rstest]
    fn successful_parses_pass_through(mytool: Command, renderer: PanelRenderer) {
        let captured = run(&mytool, &renderer, &["mytool", "--force"]);
        let ParseOutcome::Matches(matches) = captured.outcome else {
            panic!("expected matches");
        };
        assert!(matches.get_flag("force"));
        assert!(captured.out.is_empty() && captured.err.is_empty());
    }

    #[rstest]
    fn help_is_drawn_as_panels(mytool: Command, renderer: PanelRenderer) {
        let captured = run(&mytool, &renderer, &["mytool", "--help"]);
        assert_eq!(exit_code(&captured), Some(0));
        let out = &captured.out;
        assert!(out.starts_with(" Usage: mytool"), "{out}");
        assert!(captured.out.contains("╭─ Options "));
        assert!(captured.out.contains("╭─ Commands "));
        assert!(captured.err.is_empty());
    }

    #[rstest]
    fn help_targets_the_invoked_subcommand(mytool: Command, renderer: PanelRenderer) {
        let captured = run(&mytool, &renderer, &["mytool", "sync", "--help"]);
        let out = &captured.out;
        assert!(out.starts_with(" Usage: mytool sync"), "{out}");
        assert!(captured.out.contains("--dry-run"));
        assert!(!captured.out.contains("╭─ Commands "));
    }

    #[rstest]
    #[case(&["mytool", "--profile", "sync", "--help"])]
    #[case(&["mytool", "-p", "sync", "--help"])]
    fn option_values_named_like_subcommands_keep_root_help(
        mytool: Command,
        renderer: PanelRenderer,
        #[case] args: &[&str],
    ) {
        let captured = run(&mytool, &renderer, args);
        assert_eq!(exit_code(&captured), Some(0));
        let first = captured.out.lines().next().unwrap_or_default();
        assert!(first.starts_with(" Usage: mytool [OPTIONS]"), "{first}");
        assert!(!captured.out.contains("--dry-run"));
    }

    #[rstest]
    fn version_text_is_untouched(mytool: Command, renderer: PanelRenderer) {
        let captured = run(&mytool, &renderer, &["mytool", "--version"]);
        assert_eq!(exit_code(&captured), Some(0));
        assert_eq!(captured.out, "mytool 1.2.3\n");
    }

    #[rstest]
    fn errors_go_to_stderr_with_clap_exit_code(mytool: Command, renderer: PanelRenderer) {
        let captured = run(&mytool, &renderer, &["mytool", "--frob"]);
        assert_eq!(exit_code(&captured), Some(2));
        assert!(captured.out.is_empty());
        let err = &captured.err;
        assert!(err.contains("╭─ Error "), "{err}");
        assert!(err.contains("unexpected argument '--frob'"), "{err}");
        assert!(!err.contains("error: "));
    }

    #[rstest]
    fn missing_subcommand_shows_help(mytool: Command, renderer: PanelRenderer) {
        let strict = mytool.arg_required_else_help(true);
        let captured = run(&strict, &renderer, &["mytool"]);
        assert_eq!(exit_code(&captured), Some(2));
        assert!(captured.out.contains("╭─ Commands "));
    }
}
