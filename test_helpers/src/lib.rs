//! Test helpers shared across crates.
//!
//! The `figment` module wraps `figment::Jail` for configuration tests and `text`
//! picks rendered help output apart.

pub mod figment;
pub mod text;
