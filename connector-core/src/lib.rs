//! Core traits and types for the DDS Connector bindings.
//!
//! This crate holds everything the user-facing `connector` crate needs
//! without depending on a particular backend. A backend (the native
//! `librtiddsconnector` library, or the in-process loopback) implements
//! [`Session`] and the wrapper types drive it through that trait.

pub mod api;
pub mod config;
pub mod error;
pub mod helper;
#[cfg(feature = "logging")]
pub mod logger;
pub mod params;
pub mod timeout;

// Re-export commonly used types
pub use api::Session;
pub use config::ConnectorConfig;
pub use error::{Entity, Error, Result};
pub use params::{WriteAction, WriteParams};
pub use timeout::Timeout;
