//! `hello-panels` entry point: load help styling, parse, greet.

use std::io;

use camino::Utf8PathBuf;
use clap::{CommandFactory, FromArgMatches};
use panel_help::install::{PanelRenderer, ParseOutcome, parse_or_render};
use tracing_subscriber::EnvFilter;

use hello_panels::cli::{CONFIG_PATH_VAR, HelloPanelsCli, annotations, load_help_config};
use hello_panels::error::Result;
use hello_panels::message::print_plan;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();
    let exit_code = run().map_err(color_eyre::eyre::Report::from)?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<i32> {
    let config_path = std::env::var(CONFIG_PATH_VAR).ok().map(Utf8PathBuf::from);
    tracing::debug!(path = ?config_path, "loading help configuration");
    panel_help::config::install(load_help_config(config_path.as_deref())?);

    let renderer = PanelRenderer::from_shared().with_annotations(annotations());
    let command = HelloPanelsCli::command();
    match parse_or_render(&command, std::env::args_os(), &renderer)? {
        ParseOutcome::Rendered { exit_code } => {
            tracing::debug!(exit_code, "help or error screen rendered");
            Ok(exit_code)
        }
        ParseOutcome::Matches(matches) => {
            let cli = HelloPanelsCli::from_arg_matches(&matches)?;
            tracing::debug!(command = ?cli.command, "arguments parsed");
            print_plan(&cli, &mut io::stdout().lock())?;
            Ok(0)
        }
    }
}
