//! Error types for `panel_help`.

use thiserror::Error;

/// Errors surfaced while configuring or rendering help output.
#[derive(Debug, Error)]
pub enum PanelHelpError {
    /// A style string could not be parsed.
    #[error("invalid style '{value}': {message}")]
    InvalidStyle {
        /// The offending style string.
        value: String,
        /// Why parsing failed.
        message: String,
    },

    /// Help text written in the lightweight markup was malformed.
    #[error("malformed markup at byte {offset}: {message}")]
    Markup {
        /// Byte offset of the offending tag in the source text.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// Layered configuration could not be extracted.
    #[error("failed to load help configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Writing the rendered document failed.
    #[error("failed to write help output: {0}")]
    Write(#[from] std::io::Error),
}

impl PanelHelpError {
    pub(crate) fn invalid_style(value: &str, message: impl Into<String>) -> Self {
        Self::InvalidStyle {
            value: value.to_owned(),
            message: message.into(),
        }
    }

    pub(crate) fn markup(offset: usize, message: impl Into<String>) -> Self {
        Self::Markup {
            offset,
            message: message.into(),
        }
    }
}

impl From<figment::Error> for PanelHelpError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
