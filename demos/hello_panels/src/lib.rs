//! Library facade for the `hello_panels` demo so integration tests can reuse
//! the command-line types and greeting logic.

pub mod cli;
pub mod error;
pub mod message;
