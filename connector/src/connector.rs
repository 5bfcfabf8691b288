//! The connector and the session slot it shares with its children.

use crate::{DefaultSession, input::Input, output::Output};
use connector_core::{
    ConnectorConfig, Entity, Error, Result, Session, Timeout, helper::require_non_empty,
};
use parking_lot::RwLock;
use std::{fmt, path::Path, sync::Arc};

/// The session of a connector, shared with every output and input created
/// from it.
///
/// Forwarded calls hold a read lock for their whole duration. Disposal
/// takes the write lock, so it waits for in-flight calls (a blocking `wait`
/// included) and no call can reach a session after it has been dropped.
///
/// Read locks are taken recursively: a disposal queued behind a blocking
/// `wait` must not hold back the `write` that ends that wait.
pub(crate) struct SessionSlot<S> {
    session: RwLock<Option<S>>,
}

impl<S: Session> SessionSlot<S> {
    fn new(session: S) -> Self {
        SessionSlot {
            session: RwLock::new(Some(session)),
        }
    }

    /// Run `f` on the session, or fail if the connector is disposed.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&S) -> Result<R>) -> Result<R> {
        match self.session.read_recursive().as_ref() {
            Some(session) => f(session),
            None => Err(Error::Disposed(Entity::Connector)),
        }
    }

    fn take(&self) -> Option<S> {
        self.session.write().take()
    }

    fn is_disposed(&self) -> bool {
        self.session.read_recursive().is_none()
    }
}

/// Entry point: one domain participant loaded from an XML configuration.
///
/// # Example
///
/// ```ignore
/// use connector::Connector;
///
/// let connector = Connector::new("MyParticipantLibrary::Zero", "ShapeExample.xml")?;
/// let output = connector.get_output("MyPublisher::MySquareWriter")?;
/// connector.dispose()?;
/// assert!(output.write().unwrap_err().is_disposed());
/// ```
pub struct Connector<S: Session = DefaultSession> {
    config: ConnectorConfig,
    slot: Arc<SessionSlot<S>>,
}

impl Connector {
    /// Create a connector for participant `config_name` (`"Library::Participant"`)
    /// defined in `config_file`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if either argument is empty
    /// - [`Error::External`] if the configuration cannot be loaded
    pub fn new(config_name: &str, config_file: impl AsRef<Path>) -> Result<Self> {
        Self::open(ConnectorConfig::new(config_name, config_file)?)
    }

    /// Create a connector from `CONNECTOR_CONFIG_NAME` and
    /// `CONNECTOR_CONFIG_FILE`.
    pub fn from_env() -> Result<Self> {
        Self::open(ConnectorConfig::from_env()?)
    }
}

impl<S: Session> Connector<S> {
    /// Create a connector on an explicit backend.
    pub fn open(config: ConnectorConfig) -> Result<Self> {
        let session = S::open(&config)?;
        tracing::debug!(
            config_name = config.config_name(),
            config_file = %config.config_file().display(),
            "connector created"
        );
        Ok(Connector {
            config,
            slot: Arc::new(SessionSlot::new(session)),
        })
    }

    /// Configuration name this connector was created with.
    pub fn config_name(&self) -> &str {
        self.config.config_name()
    }

    /// Configuration file this connector was created with.
    pub fn config_file(&self) -> &Path {
        self.config.config_file()
    }

    pub fn is_disposed(&self) -> bool {
        self.slot.is_disposed()
    }

    /// Look up a data writer by `"Publisher::Writer"` name.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `output_name` is empty
    /// - [`Error::Disposed`] if the connector is disposed
    /// - [`Error::External`] if the writer does not exist
    pub fn get_output(&self, output_name: &str) -> Result<Output<S>> {
        require_non_empty("output_name", output_name)?;
        let writer = self.slot.with(|session| session.writer(output_name))?;
        tracing::debug!(output = output_name, "output created");
        Ok(Output::new(output_name, self.slot.clone(), writer))
    }

    /// Look up a data reader by `"Subscriber::Reader"` name.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `input_name` is empty
    /// - [`Error::Disposed`] if the connector is disposed
    /// - [`Error::External`] if the reader does not exist
    pub fn get_input(&self, input_name: &str) -> Result<Input<S>> {
        require_non_empty("input_name", input_name)?;
        let reader = self.slot.with(|session| session.reader(input_name))?;
        tracing::debug!(input = input_name, "input created");
        Ok(Input::new(input_name, self.slot.clone(), reader))
    }

    /// Block until any input of this connector has data, or `timeout_ms`
    /// milliseconds elapse (`-1` waits forever).
    ///
    /// Returns `false` if the timeout elapsed first.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfRange`] if `timeout_ms < -1`
    /// - [`Error::Disposed`] if the connector is disposed
    pub fn wait(&self, timeout_ms: i32) -> Result<bool> {
        self.wait_for(Timeout::from_millis(timeout_ms)?)
    }

    /// [`Connector::wait`] with a typed timeout.
    pub fn wait_for(&self, timeout: Timeout) -> Result<bool> {
        self.slot.with(|session| match session.wait(timeout) {
            Err(Error::Timeout) => Ok(false),
            other => other,
        })
    }

    /// Release the session. Outputs and inputs created from this connector
    /// fail with [`Error::Disposed`] from now on.
    ///
    /// Calling it again does nothing.
    pub fn dispose(&self) -> Result<()> {
        if let Some(session) = self.slot.take() {
            drop(session);
            tracing::debug!(config_name = self.config.config_name(), "connector disposed");
        }
        Ok(())
    }
}

impl<S: Session> Drop for Connector<S> {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            tracing::warn!(config_name = self.config.config_name(), "dispose failed: {e}");
        }
    }
}

impl<S: Session> fmt::Debug for Connector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("config_name", &self.config.config_name())
            .field("config_file", &self.config.config_file())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
