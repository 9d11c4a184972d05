//! Error handling for jarsigner invocations
//!
//! This module provides the error types shared by the command line builder,
//! the configuration loader and the executor, using the thiserror crate.

use crate::security::CommandError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for jarsigner operations
#[derive(Error, Debug)]
pub enum JarSignerError {
    /// Required builder configuration is missing
    #[error("Command line configuration error: {0}")]
    Configuration(String),

    /// A configuration file could not be read or parsed
    #[error("Failed to load configuration from {}: {message}", .path.display())]
    ConfigLoad { path: PathBuf, message: String },

    /// Running the jarsigner process failed
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl JarSignerError {
    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ConfigLoad { .. } => "CONFIG_LOAD_ERROR",
            Self::Command(_) => "COMMAND_ERROR",
        }
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::Configuration(_) => vec![
                "Set the jarsigner executable in .jarsigner.yaml or JARSIGNER_EXECUTABLE",
                "Point JAVA_HOME at a JDK installation",
            ],
            Self::ConfigLoad { .. } => vec![
                "Check that the configuration file exists and is readable",
                "Validate the YAML syntax of the configuration file",
            ],
            Self::Command(_) => vec![
                "Check the command output",
                "Make sure a JDK providing jarsigner is installed",
            ],
        }
    }
}
