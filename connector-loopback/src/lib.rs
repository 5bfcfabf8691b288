//! In-process backend for the DDS Connector bindings.
//!
//! [`LoopbackSession`] reads the same XML configuration the native library
//! does and delivers samples between writers and readers that live in the
//! current process. There is no wire protocol and no discovery: a write is
//! copied straight into the history cache of every reader on the same domain
//! id and topic.
//!
//! # Architecture
//!
//! - Each [`LoopbackSession`] maps to one `<domain_participant>`
//! - Writers hold a JSON instance initialized from the `<types>` defaults
//! - Readers register a history cache on a process-wide topic bus
//! - `wait` blocks on a per-session notifier signalled by every delivery
//!
//! # Example
//!
//! ```ignore
//! use connector_core::{ConnectorConfig, Session};
//! use connector_loopback::LoopbackSession;
//!
//! let config = ConnectorConfig::new("MyParticipantLibrary::Zero", "ShapeExample.xml")?;
//! let session = LoopbackSession::open(&config)?;
//! let writer = session.writer("MyPublisher::MySquareWriter")?;
//! session.set_string(&writer, "color", "BLUE")?;
//! session.write(&writer, None)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod bus;
mod cache;
mod error;
mod session;
mod types;

pub mod config;

// Re-exports
pub use config::{EndpointConfig, History, ParticipantConfig};
pub use error::ConfigError;
pub use session::{LoopbackReader, LoopbackSession, LoopbackWriter};
pub use types::{Member, MemberKind, TypeRegistry};
