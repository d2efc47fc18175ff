//! Helpers for running configuration tests inside a `figment::Jail`.
//!
//! A jail gives each test a scratch working directory and an isolated
//! environment, so style files and `PANEL_HELP_*` variables set by one test
//! never leak into another.

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// # Errors
///
/// Returns an error if the jail cannot be created or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Writes `contents` to `name` inside the jail and returns the path, relative
/// to the jail's working directory.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_file(
    jail: &figment::Jail,
    name: &str,
    contents: &str,
) -> figment::error::Result<Utf8PathBuf> {
    jail.create_file(name, contents)?;
    Ok(Utf8PathBuf::from(name))
}

/// Converts any displayable error into a [`figment::Error`] so it can cross
/// a jail closure with `?`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a `map_err` adaptor, which hands over ownership"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
