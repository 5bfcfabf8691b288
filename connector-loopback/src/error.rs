//! Error types for connector-loopback.
//!
//! Configuration problems have their own type; they reach callers as
//! [`connector_core::Error::External`], the same way a native lookup
//! failure does.

use std::path::PathBuf;
use thiserror::Error;

/// Errors found while loading an XML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration file {}: {source}", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed XML.
    #[error("cannot parse configuration: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document root is not `<dds>`.
    #[error("expected a <dds> root element, found <{0}>")]
    Root(String),

    /// A name is not of the form `Library::Name`.
    #[error("'{0}' is not a qualified name of the form 'Library::Name'")]
    BadName(String),

    /// No `<domain_participant>` matches the configuration name.
    #[error("cannot find domain participant '{0}'")]
    ParticipantNotFound(String),

    /// The participant's `domain_ref` does not resolve.
    #[error("cannot find domain '{0}'")]
    DomainNotFound(String),

    /// An endpoint's `topic_ref` does not resolve.
    #[error("cannot find topic '{topic}' referenced by '{entity}'")]
    TopicNotFound {
        /// The unresolved topic name.
        topic: String,
        /// The endpoint referencing it.
        entity: String,
    },

    /// A required attribute is absent.
    #[error("<{element}> is missing the '{attribute}' attribute")]
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// An element or attribute holds an unusable value.
    #[error("invalid value '{value}' for {what}")]
    InvalidValue {
        /// What the value configures.
        what: &'static str,
        /// The rejected text.
        value: String,
    },

    /// A struct contains itself other than through a sequence.
    #[error("recursive type: {0}")]
    RecursiveType(String),

    /// A default instance of the type would be too large to build.
    #[error("type '{0}' is too large")]
    TypeTooLarge(String),
}

impl From<ConfigError> for connector_core::Error {
    fn from(err: ConfigError) -> Self {
        connector_core::Error::External(err.to_string())
    }
}
