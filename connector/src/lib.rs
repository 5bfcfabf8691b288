//! Rust bindings for the RTI DDS Connector.
//!
//! A [`Connector`] loads one `<domain_participant>` from an XML configuration
//! file. [`Output`]s publish through the participant's data writers and
//! [`Input`]s receive through its data readers.
//!
//! # Feature Flags
//!
//! Choose exactly one backend:
//!
//! - `loopback` (default) - in-process delivery, no native library required
//! - `native` - `librtiddsconnector` through FFI; set `RTI_CONNECTOR_LIB_DIR`
//!   at build time
//!
//! # Lifecycle
//!
//! Every object is either active or disposed. `dispose` is idempotent and is
//! also run on `Drop`. Disposing a connector makes every output and input
//! created from it fail with [`Error::Disposed`]; disposing an output or
//! input leaves the connector untouched.
//!
//! # Example
//!
//! ```ignore
//! use connector::prelude::*;
//!
//! let connector = Connector::new("MyParticipantLibrary::Zero", "ShapeExample.xml")?;
//! let output = connector.get_output("MyPublisher::MySquareWriter")?;
//! output.instance().set_string("color", "BLUE")?;
//! output.instance().set_number("x", 10.0)?;
//! output.write()?;
//!
//! let input = connector.get_input("MySubscriber::MySquareReader")?;
//! if input.wait(500)? {
//!     input.take()?;
//!     for sample in input.samples().iter()? {
//!         println!("{}", sample.get_json()?);
//!     }
//! }
//! ```

// Compile-time check: ensure exactly one backend is selected
#[cfg(all(feature = "loopback", feature = "native"))]
compile_error!("Features `loopback` and `native` are mutually exclusive. Choose one backend.");

#[cfg(not(any(feature = "loopback", feature = "native")))]
compile_error!("No backend selected. Enable one of: `loopback` or `native`.");

mod connector;
mod input;
mod output;

pub mod prelude;

pub use connector::Connector;
pub use input::{Input, Sample, SampleIter, Samples};
pub use output::{Instance, Output};

// Always re-export core types and traits
pub use connector_core::{
    self, ConnectorConfig, Entity, Error, Result, Session, Timeout, WriteAction, WriteParams,
};

#[cfg(feature = "logging")]
pub use connector_core::logger;

/// Session type used when no backend is named explicitly.
#[cfg(feature = "loopback")]
pub type DefaultSession = connector_loopback::LoopbackSession;

/// Session type used when no backend is named explicitly.
#[cfg(all(feature = "native", not(feature = "loopback")))]
pub type DefaultSession = connector_native::NativeSession;

#[cfg(feature = "loopback")]
pub use connector_loopback;

#[cfg(all(feature = "native", not(feature = "loopback")))]
pub use connector_native;
