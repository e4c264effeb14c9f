//! Unified error type for all chanlog operations.

use std::path::PathBuf;

/// Error type for chanlog operations.
#[derive(Debug)]
pub enum Error {
    /// The log directory could not be created.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A rotating file could not be opened for append.
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// I/O error outside of configuration (writes, rotation, config reads).
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Cyclic include detected in config sources.
    CyclicInclude(PathBuf),
    /// Channel name is empty or whitespace.
    InvalidName(String),
    /// Log file name is empty, absolute, or escapes the log directory.
    InvalidPath(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "cannot create log directory {}: {source}", path.display())
            }
            Self::OpenFile { path, source } => {
                write!(f, "cannot open log file {}: {source}", path.display())
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::CyclicInclude(p) => write!(f, "cyclic include: {}", p.display()),
            Self::InvalidName(name) => write!(f, "invalid channel name: '{name}'"),
            Self::InvalidPath(s) => write!(f, "invalid log file path: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } | Self::OpenFile { source, .. } | Self::Io(source) => {
                Some(source)
            }
            Self::ConfigParse(e) => Some(e),
            Self::CyclicInclude(_) | Self::InvalidName(_) | Self::InvalidPath(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
