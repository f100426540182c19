//! Errors returned by command handlers and how loudly they are signalled.

use core::fmt;

use heapless::String;

use crate::{device, fs, hal};

use super::shell::Interrupted;

/// Longest command token kept in an error, in bytes.
pub const MAX_TOKEN_LEN: usize = 32;

/// A user token echoed back in a diagnostic, truncated to [`MAX_TOKEN_LEN`].
pub type Token = String<MAX_TOKEN_LEN>;

/// Copy `text` into a [`Token`], cutting it on a char boundary when full.
pub fn token(text: &str) -> Token {
    let mut token = Token::new();
    for ch in text.chars() {
        if token.push(ch).is_err() {
            break;
        }
    }
    token
}

/// How the indicator reports a failed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    /// The user got something wrong: five quick flashes.
    Minor,
    /// The filesystem or hardware failed: three slow flashes.
    Critical,
}

/// Failure of a shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// The first token names no command.
    UnknownCommand(Token),
    /// Wrong number of arguments; carries the command's usage line.
    InvalidArgumentCount {
        /// Usage line to show.
        usage: &'static str,
    },
    /// An argument could not be parsed.
    InvalidArgument {
        /// Which argument.
        what: &'static str,
        /// What the user typed.
        value: Token,
    },
    /// More tokens on the line than the shell can hold.
    TooManyArguments,
    /// The device layer refused the operation.
    Device(device::Error),
    /// A filesystem operation failed on `path`.
    Fs {
        /// Resolved path (empty when there is none to show).
        path: fs::Path,
        /// Underlying error.
        source: fs::Error,
    },
    /// A platform service failed.
    Hardware(hal::Error),
    /// A copied file did not read back with the same checksum.
    VerifyFailed {
        /// Destination path.
        path: fs::Path,
    },
    /// `run` was nested deeper than the script runner allows.
    ScriptDepth,
    /// A script line failed; the line's own error was already reported.
    ScriptAborted {
        /// 1-based line number.
        line: usize,
    },
    /// The operator pressed Ctrl-C (or the console closed) inside a command.
    Interrupted,
}

impl ShellError {
    /// Filesystem failure on a known path.
    pub fn fs(path: &str, source: fs::Error) -> Self {
        let mut shown = fs::Path::new();
        for ch in path.chars() {
            if shown.push(ch).is_err() {
                break;
            }
        }
        ShellError::Fs {
            path: shown,
            source,
        }
    }

    /// Unknown command, echoed lowercased like the lookup saw it.
    pub fn unknown(command: &str) -> Self {
        let mut lowered = Token::new();
        for ch in command.chars() {
            if lowered.push(ch.to_ascii_lowercase()).is_err() {
                break;
            }
        }
        ShellError::UnknownCommand(lowered)
    }

    /// Unparsable argument.
    pub fn invalid(what: &'static str, value: &str) -> Self {
        ShellError::InvalidArgument {
            what,
            value: token(value),
        }
    }

    /// Fault signal for this error, `None` when nothing should flash.
    ///
    /// This is the single place that decides severity. Request errors are
    /// minor; anything the medium or the silicon did wrong is critical.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            ShellError::UnknownCommand(_)
            | ShellError::InvalidArgumentCount { .. }
            | ShellError::InvalidArgument { .. }
            | ShellError::TooManyArguments
            | ShellError::ScriptDepth => Some(Severity::Minor),
            ShellError::Device(err) if err.is_hardware() => Some(Severity::Critical),
            ShellError::Device(_) => Some(Severity::Minor),
            ShellError::Fs { source, .. } if source.is_medium_fault() => Some(Severity::Critical),
            ShellError::Fs { .. } => Some(Severity::Minor),
            ShellError::Hardware(_) | ShellError::VerifyFailed { .. } => Some(Severity::Critical),
            ShellError::ScriptAborted { .. } | ShellError::Interrupted => None,
        }
    }
}

impl From<Interrupted> for ShellError {
    fn from(_: Interrupted) -> Self {
        ShellError::Interrupted
    }
}

impl From<device::Error> for ShellError {
    fn from(err: device::Error) -> Self {
        ShellError::Device(err)
    }
}

impl From<hal::Error> for ShellError {
    fn from(err: hal::Error) -> Self {
        ShellError::Hardware(err)
    }
}

impl From<fs::Error> for ShellError {
    fn from(source: fs::Error) -> Self {
        ShellError::Fs {
            path: fs::Path::new(),
            source,
        }
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::UnknownCommand(command) => write!(f, "Invalid command: {}", command),
            ShellError::InvalidArgumentCount { usage } => write!(f, "Usage: {}", usage),
            ShellError::InvalidArgument { what, value } => {
                write!(f, "Invalid {}: '{}'", what, value)
            }
            ShellError::TooManyArguments => f.write_str("Too many arguments"),
            ShellError::Device(err) => write!(f, "{}", err),
            ShellError::Fs {
                path,
                source: fs::Error::NotFound,
            } if !path.is_empty() => write!(f, "File not found: {}", path),
            ShellError::Fs { path, source } if path.is_empty() => write!(f, "{}", source),
            ShellError::Fs { path, source } => write!(f, "{}: {}", path, source),
            ShellError::Hardware(err) => write!(f, "Hardware error: {}", err),
            ShellError::VerifyFailed { path } => {
                write!(f, "Verification failed: {} does not match its source", path)
            }
            ShellError::ScriptDepth => f.write_str("Scripts are nested too deeply"),
            ShellError::ScriptAborted { line } => write!(f, "Script aborted at line {}", line),
            ShellError::Interrupted => f.write_str("Interrupted"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ShellError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ShellError::UnknownCommand(c) => defmt::write!(f, "UnknownCommand({})", c.as_str()),
            ShellError::InvalidArgumentCount { .. } => defmt::write!(f, "InvalidArgumentCount"),
            ShellError::InvalidArgument { what, .. } => defmt::write!(f, "InvalidArgument({})", what),
            ShellError::TooManyArguments => defmt::write!(f, "TooManyArguments"),
            ShellError::Device(err) => defmt::write!(f, "Device({})", err),
            ShellError::Fs { source, .. } => defmt::write!(f, "Fs({})", source),
            ShellError::Hardware(err) => defmt::write!(f, "Hardware({})", err),
            ShellError::VerifyFailed { .. } => defmt::write!(f, "VerifyFailed"),
            ShellError::ScriptDepth => defmt::write!(f, "ScriptDepth"),
            ShellError::ScriptAborted { line } => defmt::write!(f, "ScriptAborted({})", line),
            ShellError::Interrupted => defmt::write!(f, "Interrupted"),
        }
    }
}
