//! Receiving side: [`Input`], its [`Samples`] and the [`Sample`] views.

use crate::{DefaultSession, connector::SessionSlot};
use connector_core::{Entity, Error, Result, Session, Timeout, helper::require_non_empty};
use serde::de::DeserializeOwned;
use std::{fmt, sync::Arc};

/// A data reader of a [`Connector`](crate::Connector).
pub struct Input<S: Session = DefaultSession> {
    name: String,
    slot: Arc<SessionSlot<S>>,
    reader: Option<S::Reader>,
}

impl<S: Session> Input<S> {
    pub(crate) fn new(name: &str, slot: Arc<SessionSlot<S>>, reader: S::Reader) -> Self {
        Input {
            name: name.to_string(),
            slot,
            reader: Some(reader),
        }
    }

    /// The `"Subscriber::Reader"` name this input was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether [`Input::dispose`] has been called. Disposing the connector
    /// does not change it.
    pub fn is_disposed(&self) -> bool {
        self.reader.is_none()
    }

    fn with<R>(&self, f: impl FnOnce(&S, &S::Reader) -> Result<R>) -> Result<R> {
        let reader = self.reader.as_ref().ok_or(Error::Disposed(Entity::Input))?;
        self.slot.with(|session| f(session, reader))
    }

    /// Load every cached sample into [`Input::samples`]. The cache keeps
    /// them.
    pub fn read(&self) -> Result<()> {
        self.with(|session, reader| session.read(reader))
    }

    /// Move every cached sample into [`Input::samples`].
    pub fn take(&self) -> Result<()> {
        self.with(|session, reader| session.take(reader))
    }

    /// Number of samples loaded by the last `read` or `take`.
    pub fn sample_count(&self) -> Result<usize> {
        self.with(|session, reader| session.sample_count(reader))
    }

    /// The samples loaded by the last `read` or `take`.
    pub fn samples(&self) -> Samples<'_, S> {
        Samples { input: self }
    }

    /// Block until this input has data, or `timeout_ms` milliseconds elapse
    /// (`-1` waits forever).
    ///
    /// Returns `false` if the timeout elapsed first.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfRange`] if `timeout_ms < -1`
    /// - [`Error::Disposed`] if this input or its connector is disposed
    pub fn wait(&self, timeout_ms: i32) -> Result<bool> {
        self.wait_for(Timeout::from_millis(timeout_ms)?)
    }

    /// [`Input::wait`] with a typed timeout.
    pub fn wait_for(&self, timeout: Timeout) -> Result<bool> {
        self.with(|session, reader| match session.wait_reader(reader, timeout) {
            Err(Error::Timeout) => Ok(false),
            other => other,
        })
    }

    /// Release the data reader handle. Calling it again does nothing.
    pub fn dispose(&mut self) -> Result<()> {
        let Some(reader) = self.reader.take() else {
            return Ok(());
        };
        tracing::debug!(input = %self.name, "input disposed");
        match self.slot.with(move |session| session.release_reader(reader)) {
            // The handle went away with the session.
            Err(Error::Disposed(Entity::Connector)) => Ok(()),
            other => other,
        }
    }
}

impl<S: Session> Drop for Input<S> {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            tracing::warn!(input = %self.name, "dispose failed: {e}");
        }
    }
}

impl<S: Session> fmt::Debug for Input<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("name", &self.name)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// The samples of an [`Input`] loaded by its last `read` or `take`.
///
/// Indexes start at 0. Accessors fail with [`Error::OutOfRange`] for an
/// index at or past [`Samples::len`].
pub struct Samples<'a, S: Session = DefaultSession> {
    input: &'a Input<S>,
}

impl<'a, S: Session> Samples<'a, S> {
    pub fn len(&self) -> Result<usize> {
        self.input.sample_count()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Run `f` on a sample index checked against the sample count.
    fn at<R>(
        &self,
        index: usize,
        f: impl FnOnce(&S, &S::Reader) -> Result<R>,
    ) -> Result<R> {
        self.input.with(|session, reader| {
            if index >= session.sample_count(reader)? {
                return Err(Error::OutOfRange {
                    name: "index",
                    value: i64::try_from(index).unwrap_or(i64::MAX),
                });
            }
            f(session, reader)
        })
    }

    pub fn get_number(&self, index: usize, field: &str) -> Result<f64> {
        require_non_empty("field_name", field)?;
        self.at(index, |session, reader| session.get_number(reader, index, field))
    }

    pub fn get_boolean(&self, index: usize, field: &str) -> Result<bool> {
        require_non_empty("field_name", field)?;
        self.at(index, |session, reader| session.get_boolean(reader, index, field))
    }

    pub fn get_string(&self, index: usize, field: &str) -> Result<String> {
        require_non_empty("field_name", field)?;
        self.at(index, |session, reader| session.get_string(reader, index, field))
    }

    /// The whole sample as a JSON object.
    pub fn get_json(&self, index: usize) -> Result<String> {
        self.at(index, |session, reader| session.get_json(reader, index))
    }

    /// The whole sample deserialized with `serde_json`.
    pub fn deserialize<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let json = self.get_json(index)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// `false` if the sample only notifies a dispose or unregister and its
    /// fields other than the key carry no data.
    pub fn valid_data(&self, index: usize) -> Result<bool> {
        self.at(index, |session, reader| session.valid_data(reader, index))
    }

    pub fn get(&self, index: usize) -> Result<Sample<'a, S>> {
        if index >= self.len()? {
            return Err(Error::OutOfRange {
                name: "index",
                value: i64::try_from(index).unwrap_or(i64::MAX),
            });
        }
        Ok(Sample {
            samples: *self,
            index,
        })
    }

    /// Iterate over the loaded samples.
    ///
    /// The count is taken once; a `read` or `take` during iteration makes
    /// the remaining accessors see the new samples.
    pub fn iter(&self) -> Result<SampleIter<'a, S>> {
        Ok(SampleIter {
            samples: *self,
            next: 0,
            len: self.len()?,
        })
    }
}

impl<S: Session> Clone for Samples<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Session> Copy for Samples<'_, S> {}

/// One loaded sample.
pub struct Sample<'a, S: Session = DefaultSession> {
    samples: Samples<'a, S>,
    index: usize,
}

impl<S: Session> Sample<'_, S> {
    /// Position within [`Samples`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get_number(&self, field: &str) -> Result<f64> {
        self.samples.get_number(self.index, field)
    }

    pub fn get_boolean(&self, field: &str) -> Result<bool> {
        self.samples.get_boolean(self.index, field)
    }

    pub fn get_string(&self, field: &str) -> Result<String> {
        self.samples.get_string(self.index, field)
    }

    pub fn get_json(&self) -> Result<String> {
        self.samples.get_json(self.index)
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        self.samples.deserialize(self.index)
    }

    pub fn valid_data(&self) -> Result<bool> {
        self.samples.valid_data(self.index)
    }
}

impl<S: Session> Clone for Sample<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Session> Copy for Sample<'_, S> {}

impl<S: Session> fmt::Debug for Sample<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sample")
            .field("input", &self.samples.input.name)
            .field("index", &self.index)
            .finish()
    }
}

/// Iterator returned by [`Samples::iter`].
pub struct SampleIter<'a, S: Session = DefaultSession> {
    samples: Samples<'a, S>,
    next: usize,
    len: usize,
}

impl<'a, S: Session> Iterator for SampleIter<'a, S> {
    type Item = Sample<'a, S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let sample = Sample {
            samples: self.samples,
            index: self.next,
        };
        self.next += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<S: Session> ExactSizeIterator for SampleIter<'_, S> {}
