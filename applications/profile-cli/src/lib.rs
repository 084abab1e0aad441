//! Profile Account terminal front end
//!
//! Loads `AppConfig`, signs in and drives the account components from the
//! command line. The binary in `main.rs` only parses arguments and installs
//! logging.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::{run, Command, Credentials};
pub use config::AppConfig;
pub use error::{CliError, Result};
