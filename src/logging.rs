//! Logging utilities.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Logging setup error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Logger initialization error.
    #[error("Logger initialization error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Sets up a terminal logger writing to stderr.
///
/// # Errors
///
/// An error is returned if a logger has already been set.
pub fn setup_logging(max_level: impl Into<LevelFilter>) -> Result<(), Error> {
    let config = ConfigBuilder::new()
        .add_filter_allow_str(env!("CARGO_CRATE_NAME"))
        .build();
    TermLogger::init(
        max_level.into(),
        config,
        // stdout is reserved for jarsigner output
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}
