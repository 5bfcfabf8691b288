//! Loopback session, writers and readers.

use crate::{
    bus::{Bus, TopicKey},
    cache::{Notifier, ReaderCache, Sample},
    config::ParticipantConfig,
};
use connector_core::{
    ConnectorConfig, Error, Result, Session, Timeout, WriteAction, WriteParams,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;

/// An in-process participant.
pub struct LoopbackSession {
    config: ParticipantConfig,
    notifier: Arc<Notifier>,
    readers: Mutex<Vec<Arc<ReaderCache>>>,
}

/// A writer and its pending instance.
pub struct LoopbackWriter {
    entity: String,
    topic: TopicKey,
    type_name: String,
    instance: Mutex<Value>,
}

/// A reader and its history cache.
pub struct LoopbackReader {
    entity: String,
    cache: Arc<ReaderCache>,
}

impl LoopbackSession {
    /// The loaded participant configuration.
    pub fn config(&self) -> &ParticipantConfig {
        &self.config
    }

    fn check_member(&self, writer: &LoopbackWriter, field: &str) -> Result<()> {
        let Some(members) = self.config.types.members(&writer.type_name) else {
            // Undeclared type: accept anything.
            return Ok(());
        };
        let top = field.split('.').next().unwrap_or(field);
        if members.iter().any(|m| m.name == top) {
            Ok(())
        } else {
            Err(Error::External(format!(
                "cannot find member '{top}' in type '{}' of output '{}'",
                writer.type_name, writer.entity
            )))
        }
    }

    fn set_field(&self, writer: &LoopbackWriter, field: &str, value: Value) -> Result<()> {
        self.check_member(writer, field)?;
        let mut instance = writer.instance.lock();
        set_path(&mut instance, field, value)
    }

    fn field_of<R>(
        &self,
        reader: &LoopbackReader,
        index: usize,
        field: &str,
        convert: impl FnOnce(&Value) -> Option<R>,
        expected: &str,
    ) -> Result<R> {
        reader
            .cache
            .with_loaned(index, |sample| match get_path(&sample.data, field) {
                Some(value) => convert(value).ok_or_else(|| {
                    Error::External(format!("member '{field}' is not {expected}"))
                }),
                None => Err(Error::External(format!(
                    "cannot find member '{field}' in sample of input '{}'",
                    reader.entity
                ))),
            })
            .unwrap_or_else(|| Err(index_out_of_range(index)))
    }
}

fn index_out_of_range(index: usize) -> Error {
    Error::OutOfRange {
        name: "index",
        value: i64::try_from(index).unwrap_or(i64::MAX),
    }
}

fn set_path(root: &mut Value, path: &str, value: Value) -> Result<()> {
    if path.contains('[') {
        return Err(Error::External(format!(
            "indexed member access '{path}' is not supported"
        )));
    }
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            return Err(Error::InvalidArgument {
                name: "field",
                reason: "contains an empty member name",
            });
        }
        let Value::Object(object) = current else {
            return Err(Error::External(format!(
                "cannot set '{path}': '{segment}' is not inside a struct"
            )));
        };
        if segments.peek().is_none() {
            object.insert(segment.to_string(), value);
            return Ok(());
        }
        current = object
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
    }
    Ok(())
}

fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |value, segment| value.get(segment))
}

fn number_value(value: f64) -> Result<Value> {
    // Integral values are stored as integers so JSON output matches integer members.
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Ok(Value::from(value as i64));
    }
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or(Error::InvalidArgument {
            name: "value",
            reason: "must be a finite number",
        })
}

impl Session for LoopbackSession {
    type Writer = LoopbackWriter;
    type Reader = LoopbackReader;

    fn open(config: &ConnectorConfig) -> Result<Self> {
        let participant = ParticipantConfig::load(config)?;
        tracing::debug!(
            participant = %participant.name,
            domain_id = participant.domain_id,
            writers = participant.writers.len(),
            readers = participant.readers.len(),
            "loopback session opened"
        );
        Ok(LoopbackSession {
            config: participant,
            notifier: Arc::default(),
            readers: Mutex::new(Vec::new()),
        })
    }

    fn writer(&self, entity_name: &str) -> Result<LoopbackWriter> {
        let endpoint = self.config.writers.get(entity_name).ok_or_else(|| {
            Error::External(format!(
                "cannot find output '{entity_name}' in participant '{}'",
                self.config.name
            ))
        })?;
        Ok(LoopbackWriter {
            entity: entity_name.to_string(),
            topic: TopicKey {
                domain_id: self.config.domain_id,
                topic: endpoint.topic.clone(),
            },
            type_name: endpoint.type_name.clone(),
            instance: Mutex::new(self.config.types.default_value(&endpoint.type_name)),
        })
    }

    fn reader(&self, entity_name: &str) -> Result<LoopbackReader> {
        let endpoint = self.config.readers.get(entity_name).ok_or_else(|| {
            Error::External(format!(
                "cannot find input '{entity_name}' in participant '{}'",
                self.config.name
            ))
        })?;
        let cache = Arc::new(ReaderCache::new(endpoint.history, self.notifier.clone()));
        Bus::global().subscribe(
            TopicKey {
                domain_id: self.config.domain_id,
                topic: endpoint.topic.clone(),
            },
            &cache,
        );
        self.readers.lock().push(cache.clone());
        Ok(LoopbackReader {
            entity: entity_name.to_string(),
            cache,
        })
    }

    fn release_reader(&self, reader: LoopbackReader) -> Result<()> {
        self.readers
            .lock()
            .retain(|cache| !Arc::ptr_eq(cache, &reader.cache));
        Ok(())
    }

    fn write(&self, writer: &LoopbackWriter, params: Option<&WriteParams>) -> Result<()> {
        let action = params.map(|p| p.action).unwrap_or_default();
        let sample = Sample {
            data: writer.instance.lock().clone(),
            valid_data: action == WriteAction::Write,
        };
        let delivered = Bus::global().publish(&writer.topic, &sample);
        tracing::trace!(output = %writer.entity, ?action, delivered, "loopback write");
        Ok(())
    }

    fn clear(&self, writer: &LoopbackWriter) -> Result<()> {
        *writer.instance.lock() = self.config.types.default_value(&writer.type_name);
        Ok(())
    }

    fn set_number(&self, writer: &LoopbackWriter, field: &str, value: f64) -> Result<()> {
        self.set_field(writer, field, number_value(value)?)
    }

    fn set_boolean(&self, writer: &LoopbackWriter, field: &str, value: bool) -> Result<()> {
        self.set_field(writer, field, Value::Bool(value))
    }

    fn set_string(&self, writer: &LoopbackWriter, field: &str, value: &str) -> Result<()> {
        self.set_field(writer, field, Value::String(value.to_string()))
    }

    fn set_json(&self, writer: &LoopbackWriter, json: &str) -> Result<()> {
        let Value::Object(fields) = serde_json::from_str::<Value>(json)? else {
            return Err(Error::InvalidArgument {
                name: "json",
                reason: "must be a JSON object",
            });
        };
        for name in fields.keys() {
            self.check_member(writer, name)?;
        }
        let mut instance = writer.instance.lock();
        for (name, value) in fields {
            set_path(&mut instance, &name, value)?;
        }
        Ok(())
    }

    fn read(&self, reader: &LoopbackReader) -> Result<()> {
        reader.cache.read();
        Ok(())
    }

    fn take(&self, reader: &LoopbackReader) -> Result<()> {
        reader.cache.take();
        Ok(())
    }

    fn sample_count(&self, reader: &LoopbackReader) -> Result<usize> {
        Ok(reader.cache.loaned_len())
    }

    fn get_number(&self, reader: &LoopbackReader, index: usize, field: &str) -> Result<f64> {
        self.field_of(reader, index, field, Value::as_f64, "a number")
    }

    fn get_boolean(&self, reader: &LoopbackReader, index: usize, field: &str) -> Result<bool> {
        self.field_of(
            reader,
            index,
            field,
            |v| match v {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => n.as_f64().map(|n| n != 0.0),
                _ => None,
            },
            "a boolean",
        )
    }

    fn get_string(&self, reader: &LoopbackReader, index: usize, field: &str) -> Result<String> {
        self.field_of(
            reader,
            index,
            field,
            |v| match v {
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
            "a string",
        )
    }

    fn get_json(&self, reader: &LoopbackReader, index: usize) -> Result<String> {
        reader
            .cache
            .with_loaned(index, |sample| serde_json::to_string(&sample.data))
            .ok_or_else(|| index_out_of_range(index))?
            .map_err(Error::from)
    }

    fn valid_data(&self, reader: &LoopbackReader, index: usize) -> Result<bool> {
        reader
            .cache
            .with_loaned(index, |sample| sample.valid_data)
            .ok_or_else(|| index_out_of_range(index))
    }

    fn wait(&self, timeout: Timeout) -> Result<bool> {
        Ok(self.notifier.wait_until(timeout, || {
            self.readers.lock().iter().any(|cache| cache.has_unread())
        }))
    }

    fn wait_reader(&self, reader: &LoopbackReader, timeout: Timeout) -> Result<bool> {
        Ok(self
            .notifier
            .wait_until(timeout, || reader.cache.has_unread()))
    }
}

impl Drop for LoopbackSession {
    fn drop(&mut self) {
        tracing::debug!(participant = %self.config.name, "loopback session closed");
    }
}
