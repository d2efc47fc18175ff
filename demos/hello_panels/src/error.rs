//! Error types for the `hello_panels` demo.

use thiserror::Error;

/// Errors raised by the demo.
#[derive(Debug, Error)]
pub enum HelloPanelsError {
    /// Help configuration could not be loaded or help could not be drawn.
    #[error(transparent)]
    Help(#[from] panel_help::PanelHelpError),
    /// Parsed matches did not fit the command-line structure.
    #[error("failed to read arguments: {0}")]
    Arguments(#[from] clap::Error),
    /// Writing the greeting failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result alias for the demo.
pub type Result<T> = std::result::Result<T, HelloPanelsError>;
