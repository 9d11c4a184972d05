//! Built jarsigner command lines
//!
//! A [`CommandLine`] keeps every argument together with its sensitivity. Passwords
//! are held as [`Arg::Masked`] and every textual rendering prints [`MASK`] in their
//! place; only [`CommandLine::to_command`] exposes the real values.

use secrecy::{ExposeSecret, SecretString};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Replacement text for masked arguments
pub const MASK: &str = "*****";

/// A single command line argument
#[derive(Debug, Clone)]
pub enum Arg {
    /// Argument that may be logged as-is
    Plain(String),
    /// File path, passed to the process without UTF-8 conversion
    Path(PathBuf),
    /// Argument that must never be logged (passwords)
    Masked(SecretString),
}

impl Arg {
    pub fn is_masked(&self) -> bool {
        matches!(self, Self::Masked(_))
    }

    /// Returns the real value of the argument, including secrets
    pub fn expose(&self) -> &OsStr {
        match self {
            Self::Plain(value) => OsStr::new(value),
            Self::Path(path) => path.as_os_str(),
            Self::Masked(secret) => OsStr::new(secret.expose_secret()),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => f.write_str(value),
            Self::Path(path) => f.write_str(&path.to_string_lossy()),
            Self::Masked(_) => f.write_str(MASK),
        }
    }
}

/// Executable, working directory and ordered arguments of one jarsigner run
#[derive(Debug, Clone)]
pub struct CommandLine {
    executable: PathBuf,
    working_directory: Option<PathBuf>,
    args: Vec<Arg>,
}

impl CommandLine {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_directory: None,
            args: Vec::new(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    pub fn set_working_directory(&mut self, working_directory: Option<PathBuf>) {
        self.working_directory = working_directory;
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Appends a plain argument
    pub fn push(&mut self, value: impl Into<String>) {
        self.args.push(Arg::Plain(value.into()));
    }

    /// Appends a file path as-is
    pub fn push_path(&mut self, path: impl Into<PathBuf>) {
        self.args.push(Arg::Path(path.into()));
    }

    /// Appends an argument that is masked in every rendering
    pub fn push_masked(&mut self, value: SecretString) {
        self.args.push(Arg::Masked(value));
    }

    /// Inserts a plain argument in front of all other arguments
    pub fn push_front(&mut self, value: impl Into<String>) {
        self.args.insert(0, Arg::Plain(value.into()));
    }

    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args
            .extend(values.into_iter().map(|value| Arg::Plain(value.into())));
    }

    /// Arguments as they may appear in logs
    pub fn masked_args(&self) -> Vec<String> {
        self.args.iter().map(ToString::to_string).collect()
    }

    /// Builds a process command carrying the real argument values
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        command.args(self.args.iter().map(Arg::expose));
        if let Some(dir) = &self.working_directory {
            command.current_dir(dir);
        }
        command
    }
}

fn write_token(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
    let needs_quotes =
        token.is_empty() || token.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if !needs_quotes {
        return f.write_str(token);
    }

    f.write_str("\"")?;
    for c in token.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, &self.executable.to_string_lossy())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_token(f, &arg.to_string())?;
        }
        Ok(())
    }
}
