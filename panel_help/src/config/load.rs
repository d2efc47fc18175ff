//! Layered loading of [`StyleConfig`] through `figment`.

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use uncased::Uncased;

use super::StyleConfig;
use crate::error::PanelHelpError;

/// Prefix of environment variables that override configuration values.
///
/// Nested keys are separated with `__`, so `PANEL_HELP_STYLES__OPTION`
/// sets `styles.option`.
pub const ENV_PREFIX: &str = "PANEL_HELP_";

/// Environment variable read as `layout.max_width`.
pub const TERMINAL_WIDTH_VAR: &str = "TERMINAL_WIDTH";

impl StyleConfig {
    /// Builds the provider stack used by [`StyleConfig::load`].
    ///
    /// Sources, lowest priority first: built-in defaults, the TOML file at
    /// `path` (silently skipped when absent), `TERMINAL_WIDTH`, then
    /// `PANEL_HELP_*` variables.
    #[must_use]
    pub fn figment(path: Option<&Utf8Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = path {
            figment = figment.merge(Toml::file(file.as_std_path()));
        }
        figment
            .merge(
                Env::raw()
                    .only(&[TERMINAL_WIDTH_VAR])
                    .map(|_| Uncased::from("layout.max_width")),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads the configuration from defaults, an optional file and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHelpError::Config`] when a source cannot be parsed or a
    /// value has the wrong type, including unparsable style strings.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, PanelHelpError> {
        Ok(Self::figment(path).extract()?)
    }
}
