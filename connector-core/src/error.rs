//! Error types for Connector operations.

use std::fmt::{self, Display};
use thiserror::Error;

/// Result type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The wrapper object an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A connector session.
    Connector,
    /// A writer wrapper.
    Output,
    /// A reader wrapper.
    Input,
}

impl Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Connector => "Connector",
            Entity::Output => "Output",
            Entity::Input => "Input",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in Connector operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument is null, empty or otherwise unusable.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The object, or the connector owning it, has been disposed.
    #[error("{0} has been disposed")]
    Disposed(Entity),

    /// The native library failed to resolve or operate on a resource.
    #[error("external resource error: {0}")]
    External(String),

    /// A numeric argument is outside its accepted range.
    #[error("argument `{name}` out of range: {value}")]
    OutOfRange {
        /// Name of the offending argument.
        name: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// Sample (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking call reached its timeout.
    #[error("timed out")]
    Timeout,
}

impl Error {
    /// Error for a missing (empty) identifier.
    pub fn empty_argument(name: &'static str) -> Self {
        Error::InvalidArgument {
            name,
            reason: "must not be null or empty",
        }
    }

    /// Error for a failure reported by the backend.
    pub fn external(msg: impl Into<String>) -> Self {
        Error::External(msg.into())
    }

    /// Returns `true` if this is a [`Error::Disposed`] error.
    pub fn is_disposed(&self) -> bool {
        matches!(self, Error::Disposed(_))
    }
}
