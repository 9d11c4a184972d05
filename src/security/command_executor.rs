//! JarSignerExecutor: runs built jarsigner command lines
//!
//! # Security Features
//!
//! - **Allow-list validation**: Only executables named `jarsigner` can run
//! - **Injection prevention**: Uses `std::process::Command`, no shell is involved
//! - **Secret masking**: Only the masked command line is logged or returned
//! - **Working directory validation**: Validates existence before execution
//!
//! # Example
//!
//! ```rust,no_run
//! use jarsigner_command::{CommandLineBuilder, JarSignerExecutor, JarSignerRequest};
//!
//! let mut builder = CommandLineBuilder::new();
//! builder.set_executable("jarsigner");
//! let cli = builder.build(&JarSignerRequest::verify("app.jar")).unwrap();
//!
//! let output = JarSignerExecutor::new().execute(&cli).unwrap();
//! println!("{}", output.stdout);
//! ```

use crate::core::command_line::CommandLine;
use log::{debug, info};
use std::path::PathBuf;
use thiserror::Error;

/// Executable file names allowed to run.
const ALLOWED_EXECUTABLES: &[&str] = &["jarsigner", "jarsigner.exe"];

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    /// Executable is not a jarsigner binary
    #[error("Executable '{0}' is not allowed, expected jarsigner")]
    ExecutableNotAllowed(PathBuf),

    /// Working directory does not exist or is not accessible
    #[error("Working directory does not exist: {0}")]
    InvalidWorkingDirectory(PathBuf),

    /// Command execution failed (e.g., binary not found, permission denied)
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),
}

/// Captured result of a jarsigner run
///
/// The exit code is reported as-is; `None` means the process was terminated by a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarSignerOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Masked rendering of the command line that ran
    pub command_line: String,
}

impl JarSignerOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs jarsigner command lines
#[derive(Debug, Default)]
pub struct JarSignerExecutor {
    _private: (),
}

impl JarSignerExecutor {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Execute a command line and capture its output.
    ///
    /// # Errors
    ///
    /// - `CommandError::ExecutableNotAllowed` - Executable is not named jarsigner
    /// - `CommandError::InvalidWorkingDirectory` - Working directory does not exist
    /// - `CommandError::ExecutionFailed` - Binary not found or execution error
    pub fn execute(&self, cli: &CommandLine) -> Result<JarSignerOutput, CommandError> {
        let file_name = cli
            .executable()
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if !ALLOWED_EXECUTABLES.contains(&file_name) {
            return Err(CommandError::ExecutableNotAllowed(
                cli.executable().to_path_buf(),
            ));
        }

        if let Some(dir) = cli.working_directory()
            && !dir.is_dir()
        {
            return Err(CommandError::InvalidWorkingDirectory(dir.to_path_buf()));
        }

        let command_line = cli.to_string();
        info!("Executing {}", command_line);

        let output = cli
            .to_command()
            .output()
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

        let exit_code = output.status.code();
        debug!("jarsigner exited with {:?}", exit_code);

        Ok(JarSignerOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            command_line,
        })
    }
}
