//! Native backend for the DDS Connector bindings.
//!
//! This crate declares the C surface of `librtiddsconnector` and wraps it in
//! [`NativeSession`], an implementation of [`connector_core::Session`].
//!
//! The library is located at build time through `RTI_CONNECTOR_LIB_DIR` (see
//! `connector-build`). Without it the crate still builds, but only the
//! return-code mapping in [`error`] is available.

pub mod error;

#[cfg(rti_connector)]
mod ffi;
#[cfg(rti_connector)]
mod session;

#[cfg(rti_connector)]
pub use session::{NativeReader, NativeSession, NativeWriter};
