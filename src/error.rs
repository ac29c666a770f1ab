//! Unified error types for the line editor.

use std::fmt;
use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ReadError
// ---------------------------------------------------------------------------

/// Errors returned by the `read_*` family of operations.
#[derive(Debug)]
pub enum ReadError {
    /// Stdin is not an interactive terminal; callers fall back to plain input.
    NotATerminal,
    /// Ctrl-D on an empty buffer, or stdin closed.
    Eof,
    /// Second Ctrl-C inside the interrupt window.
    Interrupted,
    /// Any other terminal read/write failure.
    Io(io::Error),
}

impl ReadError {
    /// Whether this outcome is a normal end of session rather than a failure.
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Eof | Self::Interrupted)
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotATerminal => write!(f, "stdin is not a terminal"),
            Self::Eof => write!(f, "end of input"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// HistoryError
// ---------------------------------------------------------------------------

/// Errors reading or writing the history file.
#[derive(Debug)]
pub enum HistoryError {
    Load { path: PathBuf, source: io::Error },
    Save { path: PathBuf, source: io::Error },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, source } => {
                write!(f, "failed to load history from {}: {source}", path.display())
            }
            Self::Save { path, source } => {
                write!(f, "failed to save history to {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load { source, .. } | Self::Save { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}
