//! Publishing side: [`Output`] and its [`Instance`].

use crate::{DefaultSession, connector::SessionSlot};
use connector_core::{
    Entity, Error, Result, Session, WriteParams, helper::require_non_empty,
};
use serde::Serialize;
use std::{fmt, sync::Arc};

/// A data writer of a [`Connector`](crate::Connector).
pub struct Output<S: Session = DefaultSession> {
    name: String,
    slot: Arc<SessionSlot<S>>,
    writer: Option<S::Writer>,
}

impl<S: Session> Output<S> {
    pub(crate) fn new(name: &str, slot: Arc<SessionSlot<S>>, writer: S::Writer) -> Self {
        Output {
            name: name.to_string(),
            slot,
            writer: Some(writer),
        }
    }

    /// The `"Publisher::Writer"` name this output was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether [`Output::dispose`] has been called. Disposing the connector
    /// does not change it.
    pub fn is_disposed(&self) -> bool {
        self.writer.is_none()
    }

    fn with<R>(&self, f: impl FnOnce(&S, &S::Writer) -> Result<R>) -> Result<R> {
        let writer = self.writer.as_ref().ok_or(Error::Disposed(Entity::Output))?;
        self.slot.with(|session| f(session, writer))
    }

    /// The sample [`Output::write`] publishes.
    pub fn instance(&self) -> Instance<'_, S> {
        Instance { output: self }
    }

    /// Publish the current instance.
    ///
    /// # Errors
    ///
    /// [`Error::Disposed`] if this output or its connector is disposed.
    pub fn write(&self) -> Result<()> {
        self.with(|session, writer| session.write(writer, None))
    }

    /// Publish the current instance with explicit parameters, e.g. to
    /// dispose or unregister it.
    pub fn write_with(&self, params: &WriteParams) -> Result<()> {
        self.with(|session, writer| session.write(writer, Some(params)))
    }

    /// Reset every field of the instance to its default value.
    pub fn clear(&self) -> Result<()> {
        self.with(|session, writer| session.clear(writer))
    }

    /// Release the data writer handle. Calling it again does nothing.
    pub fn dispose(&mut self) -> Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        tracing::debug!(output = %self.name, "output disposed");
        match self.slot.with(move |session| session.release_writer(writer)) {
            // The handle went away with the session.
            Err(Error::Disposed(Entity::Connector)) => Ok(()),
            other => other,
        }
    }
}

impl<S: Session> Drop for Output<S> {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            tracing::warn!(output = %self.name, "dispose failed: {e}");
        }
    }
}

impl<S: Session> fmt::Debug for Output<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("name", &self.name)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// The pending sample of an [`Output`].
///
/// Field names follow the configuration's type; nested members are reached
/// with `.` (`"center.x"`).
pub struct Instance<'a, S: Session = DefaultSession> {
    output: &'a Output<S>,
}

impl<S: Session> Instance<'_, S> {
    pub fn set_number(&self, field: &str, value: f64) -> Result<()> {
        require_non_empty("field_name", field)?;
        self.output
            .with(|session, writer| session.set_number(writer, field, value))
    }

    pub fn set_boolean(&self, field: &str, value: bool) -> Result<()> {
        require_non_empty("field_name", field)?;
        self.output
            .with(|session, writer| session.set_boolean(writer, field, value))
    }

    pub fn set_string(&self, field: &str, value: &str) -> Result<()> {
        require_non_empty("field_name", field)?;
        self.output
            .with(|session, writer| session.set_string(writer, field, value))
    }

    /// Set every field present in a JSON object. Fields not mentioned keep
    /// their value.
    pub fn set_json(&self, json: &str) -> Result<()> {
        require_non_empty("json", json)?;
        self.output.with(|session, writer| session.set_json(writer, json))
    }

    /// Set the fields of `value` as serialized by `serde_json`.
    ///
    /// ```ignore
    /// #[derive(serde::Serialize)]
    /// struct Shape<'a> { color: &'a str, x: i32, y: i32 }
    ///
    /// output.instance().set(&Shape { color: "BLUE", x: 1, y: 2 })?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set_json(&json)
    }
}

impl<S: Session> Clone for Instance<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Session> Copy for Instance<'_, S> {}
