//! Error types for the hyperspace engine

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid static configuration: board dimensions, weights, difficulty names.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// A caller broke a precondition of the core (e.g. asked for a move on a full board).
    #[error("invariant violated: {message}")]
    InvariantViolation { message: String },

    /// A game action the current state does not allow.
    #[error("illegal action: {reason}")]
    IllegalAction { reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation {
            message: message.into(),
        }
    }

    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Error::IllegalAction {
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
