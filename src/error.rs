use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Where a flag value came from, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Written on the command line.
    CommandLine,
    /// Read from the named environment variable.
    Env(String),
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::CommandLine => write!(f, "command line"),
            ValueSource::Env(var) => write!(f, "environment variable {var}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PixiecoreError {
    #[error("Invalid value {value:?} for --{flag} (from {origin}): {reason}")]
    FlagParse {
        flag: String,
        origin: ValueSource,
        value: String,
        reason: String,
    },

    #[error("Couldn't read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP port must be >0 and <65536, got {0}")]
    InvalidPort(i64),

    #[error("Listen address must be IPv4, got {0}")]
    NonIpv4ListenAddr(IpAddr),

    #[error("Legacy invocation: {0}")]
    Legacy(String),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl PixiecoreError {
    /// Process exit status for this error. Every configuration failure is fatal
    /// with the same status.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
