//! Connector configuration.
//!
//! A connector is created from an XML configuration file and the qualified
//! name of a `<domain_participant>` inside it (`"Library::Participant"`).
//!
//! # Example
//!
//! ```
//! use connector_core::ConnectorConfig;
//!
//! let config = ConnectorConfig::new("MyParticipantLibrary::Zero", "ShapeExample.xml").unwrap();
//! assert_eq!(config.config_name(), "MyParticipantLibrary::Zero");
//!
//! assert!(ConnectorConfig::new("", "ShapeExample.xml").is_err());
//! ```

use crate::{
    error::{Error, Result},
    helper::require_non_empty,
};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable holding the participant configuration name.
pub const CONNECTOR_CONFIG_NAME: &str = "CONNECTOR_CONFIG_NAME";

/// Environment variable holding the XML configuration file path.
pub const CONNECTOR_CONFIG_FILE: &str = "CONNECTOR_CONFIG_FILE";

/// Validated configuration identifiers for a connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    config_name: String,
    config_file: PathBuf,
}

impl ConnectorConfig {
    /// Create a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either identifier is empty.
    pub fn new(config_name: &str, config_file: impl AsRef<Path>) -> Result<Self> {
        let config_file = config_file.as_ref();
        require_non_empty("config_name", config_name)?;
        if config_file.as_os_str().is_empty() {
            return Err(Error::empty_argument("config_file"));
        }

        Ok(ConnectorConfig {
            config_name: config_name.to_string(),
            config_file: config_file.to_path_buf(),
        })
    }

    /// Read the configuration from `CONNECTOR_CONFIG_NAME` and
    /// `CONNECTOR_CONFIG_FILE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let name = lookup(CONNECTOR_CONFIG_NAME).unwrap_or_default();
        let file = lookup(CONNECTOR_CONFIG_FILE).unwrap_or_default();
        tracing::debug!(config_name = %name, config_file = %file, "connector configuration from environment");
        Self::new(&name, file)
    }

    /// The qualified `<domain_participant>` name.
    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// Path to the XML configuration file.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }
}
