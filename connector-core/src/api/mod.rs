//! Backend API.
//!
//! A [`Session`] is what a connector holds while it is active: a native
//! `RTI_Connector*` for the FFI backend, or an in-process participant for the
//! loopback backend. The wrapper types in the `connector` crate never talk to
//! a backend except through this trait, and they guarantee that no method is
//! called on a session after it has been dropped.
//!
//! Writer and reader handles are plain values owned by the wrappers. Every
//! operation on them takes the session they were created from, so a handle
//! cannot outlive its session in a way that lets it reach the backend.
//!
//! # Sample indexes
//!
//! Indexes passed to the sample accessors are 0-based and are checked by the
//! caller against [`Session::sample_count`].

use crate::{ConnectorConfig, Result, Timeout, WriteParams};

/// A backend session bound to one participant configuration.
pub trait Session: Send + Sync + Sized + 'static {
    /// Writer handle returned by [`Session::writer`].
    type Writer: Send + Sync + 'static;

    /// Reader handle returned by [`Session::reader`].
    type Reader: Send + Sync + 'static;

    /// Open a session for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::External`](crate::Error::External) if the backend
    /// cannot load the configuration.
    fn open(config: &ConnectorConfig) -> Result<Self>;

    // ========================================================================
    // Entity lookup
    // ========================================================================

    /// Look up a writer by its qualified name (`"Publisher::Writer"`).
    fn writer(&self, entity_name: &str) -> Result<Self::Writer>;

    /// Look up a reader by its qualified name (`"Subscriber::Reader"`).
    fn reader(&self, entity_name: &str) -> Result<Self::Reader>;

    /// Release a writer handle. The default drops it.
    fn release_writer(&self, writer: Self::Writer) -> Result<()> {
        drop(writer);
        Ok(())
    }

    /// Release a reader handle. The default drops it.
    fn release_reader(&self, reader: Self::Reader) -> Result<()> {
        drop(reader);
        Ok(())
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Publish the writer's current instance.
    fn write(&self, writer: &Self::Writer, params: Option<&WriteParams>) -> Result<()>;

    /// Reset the writer's instance to default values.
    fn clear(&self, writer: &Self::Writer) -> Result<()>;

    /// Set a numeric field of the writer's instance.
    fn set_number(&self, writer: &Self::Writer, field: &str, value: f64) -> Result<()>;

    /// Set a boolean field of the writer's instance.
    fn set_boolean(&self, writer: &Self::Writer, field: &str, value: bool) -> Result<()>;

    /// Set a string field of the writer's instance.
    fn set_string(&self, writer: &Self::Writer, field: &str, value: &str) -> Result<()>;

    /// Set the fields present in a JSON object.
    fn set_json(&self, writer: &Self::Writer, json: &str) -> Result<()>;

    // ========================================================================
    // Input
    // ========================================================================

    /// Load every cached sample into the reader's sample collection,
    /// leaving them in the cache.
    fn read(&self, reader: &Self::Reader) -> Result<()>;

    /// Move every cached sample into the reader's sample collection.
    fn take(&self, reader: &Self::Reader) -> Result<()>;

    /// Number of samples loaded by the last `read` or `take`.
    fn sample_count(&self, reader: &Self::Reader) -> Result<usize>;

    /// Numeric field of a loaded sample.
    fn get_number(&self, reader: &Self::Reader, index: usize, field: &str) -> Result<f64>;

    /// Boolean field of a loaded sample.
    fn get_boolean(&self, reader: &Self::Reader, index: usize, field: &str) -> Result<bool>;

    /// String field of a loaded sample.
    fn get_string(&self, reader: &Self::Reader, index: usize, field: &str) -> Result<String>;

    /// A loaded sample as a JSON object.
    fn get_json(&self, reader: &Self::Reader, index: usize) -> Result<String>;

    /// Whether a loaded sample carries data (`false` for dispose or
    /// unregister notifications).
    fn valid_data(&self, reader: &Self::Reader, index: usize) -> Result<bool>;

    // ========================================================================
    // Waiting
    // ========================================================================

    /// Block until any reader of this session has unread data.
    ///
    /// Returns `Ok(false)` when the timeout elapses first.
    fn wait(&self, timeout: Timeout) -> Result<bool>;

    /// Block until `reader` has unread data.
    ///
    /// Returns `Ok(false)` when the timeout elapses first.
    fn wait_reader(&self, reader: &Self::Reader, timeout: Timeout) -> Result<bool>;
}
