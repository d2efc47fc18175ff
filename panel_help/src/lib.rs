//! Styled, grouped and panelled help output for `clap` command-line tools.
//!
//! `panel_help` replaces `clap`'s plain help text with a screen of bordered
//! panels: options and subcommands can be split into named groups, flags and
//! metavars are coloured, and help text may use a bracketed markup or
//! Markdown. Rendering is driven by a [`config::StyleConfig`] that can be
//! layered from defaults, a TOML file and the environment.
//!
//! The usual entry point is [`install::parse_or_render`]:
//!
//! ```no_run
//! use panel_help::install::{PanelRenderer, ParseOutcome, parse_or_render};
//!
//! let cmd = clap::Command::new("tool").about("Does things");
//! match parse_or_render(&cmd, std::env::args_os(), &PanelRenderer::from_shared())? {
//!     ParseOutcome::Matches(_matches) => { /* run the tool */ }
//!     ParseOutcome::Rendered { exit_code } => std::process::exit(exit_code),
//! }
//! # Ok::<(), panel_help::PanelHelpError>(())
//! ```

pub mod compose;
pub mod config;
pub mod descriptor;
mod error;
pub mod groups;
pub mod install;
pub mod output;
pub mod panel;
pub mod rows;
pub mod style;
pub mod text;

pub use compose::{Document, compose, compose_error, render};
pub use config::StyleConfig;
pub use descriptor::CommandDescriptor;
pub use error::PanelHelpError;
pub use install::{HelpRenderer, PanelRenderer, ParseOutcome, parse_or_render};
pub use style::Style;
pub use text::StyledText;
