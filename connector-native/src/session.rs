//! Session backed by `librtiddsconnector`.

use crate::{
    error::{ret_val_to_err, wait_ret_val},
    ffi,
};
use connector_core::{ConnectorConfig, Error, Result, Session, Timeout, WriteParams};
use libc::{c_char, c_double, c_int, c_void};
use parking_lot::{Mutex, const_mutex};
use std::{
    ffi::{CStr, CString},
    ptr::{self, NonNull},
};

/// Serializes calls into the native library. Blocking waits do not take it.
static MT_UNSAFE_FN: Mutex<()> = const_mutex(());

/// Message recorded by the last failing native call.
///
/// Must be called with `MT_UNSAFE_FN` held.
fn last_error() -> Option<String> {
    unsafe {
        let msg = ffi::RTI_Connector_get_last_error_message();
        take_string(msg)
    }
}

/// Copy and free a string allocated by the native library.
unsafe fn take_string(s: *mut c_char) -> Option<String> {
    if s.is_null() {
        return None;
    }
    let owned = unsafe { CStr::from_ptr(s) }.to_string_lossy().into_owned();
    unsafe { ffi::RTI_Connector_free_string(s) };
    Some(owned)
}

fn to_cstring(name: &'static str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::InvalidArgument {
        name,
        reason: "contains an interior NUL byte",
    })
}

/// The native accessors count samples from 1.
fn native_index(index: usize) -> Result<c_int> {
    index
        .checked_add(1)
        .and_then(|i| c_int::try_from(i).ok())
        .ok_or(Error::OutOfRange {
            name: "index",
            value: i64::try_from(index).unwrap_or(i64::MAX),
        })
}

/// A native `RTI_Connector`.
///
/// Dropping the session deletes the native connector together with every
/// writer and reader it created.
pub struct NativeSession {
    connector: NonNull<ffi::RTI_Connector>,
}

impl NativeSession {
    fn as_ptr(&self) -> *mut ffi::RTI_Connector {
        self.connector.as_ptr()
    }

    /// Run a native call that returns a return code.
    fn call(&self, f: impl FnOnce(*mut ffi::RTI_Connector) -> c_int) -> Result<()> {
        let _guard = MT_UNSAFE_FN.lock();
        let ret = f(self.as_ptr());
        ret_val_to_err(ret, last_error)
    }
}

impl Drop for NativeSession {
    fn drop(&mut self) {
        let _guard = MT_UNSAFE_FN.lock();
        unsafe { ffi::RTI_Connector_delete(self.as_ptr()) };
        tracing::debug!("native connector deleted");
    }
}

unsafe impl Send for NativeSession {}
unsafe impl Sync for NativeSession {}

/// A native `DDS_DataWriter` looked up by name.
///
/// The writer belongs to the connector; there is nothing to release.
pub struct NativeWriter {
    entity: CString,
    _writer: NonNull<c_void>,
}

unsafe impl Send for NativeWriter {}
unsafe impl Sync for NativeWriter {}

/// A native `DDS_DataReader` looked up by name.
pub struct NativeReader {
    entity: CString,
    reader: NonNull<c_void>,
}

unsafe impl Send for NativeReader {}
unsafe impl Sync for NativeReader {}

impl Session for NativeSession {
    type Writer = NativeWriter;
    type Reader = NativeReader;

    fn open(config: &ConnectorConfig) -> Result<Self> {
        let name_c = to_cstring("config_name", config.config_name())?;
        let file = config.config_file().to_str().ok_or(Error::InvalidArgument {
            name: "config_file",
            reason: "is not valid UTF-8",
        })?;
        let file_c = to_cstring("config_file", file)?;

        let options = ffi::RTI_Connector_Options {
            enable_on_data_event: 1,
            one_based_sequence_indexing: 0,
        };

        let guard = MT_UNSAFE_FN.lock();
        let ptr = unsafe { ffi::RTI_Connector_new(name_c.as_ptr(), file_c.as_ptr(), &options) };
        match NonNull::new(ptr) {
            Some(connector) => {
                drop(guard);
                tracing::debug!(config_name = config.config_name(), config_file = file, "native connector created");
                Ok(NativeSession { connector })
            }
            None => {
                let msg = last_error().unwrap_or_else(|| {
                    format!(
                        "cannot create connector '{}' from {file}",
                        config.config_name()
                    )
                });
                Err(Error::External(msg))
            }
        }
    }

    fn writer(&self, entity_name: &str) -> Result<NativeWriter> {
        let entity = to_cstring("name", entity_name)?;
        let mut writer: *mut c_void = ptr::null_mut();
        self.call(|c| unsafe {
            ffi::RTI_Connector_get_datawriter(c, entity.as_ptr(), &mut writer)
        })?;
        let writer = NonNull::new(writer)
            .ok_or_else(|| Error::External(format!("error getting output '{entity_name}'")))?;
        Ok(NativeWriter {
            entity,
            _writer: writer,
        })
    }

    fn reader(&self, entity_name: &str) -> Result<NativeReader> {
        let entity = to_cstring("name", entity_name)?;
        let mut reader: *mut c_void = ptr::null_mut();
        self.call(|c| unsafe {
            ffi::RTI_Connector_get_datareader(c, entity.as_ptr(), &mut reader)
        })?;
        let reader = NonNull::new(reader)
            .ok_or_else(|| Error::External(format!("error getting input '{entity_name}'")))?;
        Ok(NativeReader { entity, reader })
    }

    fn write(&self, writer: &NativeWriter, params: Option<&WriteParams>) -> Result<()> {
        let params_c = match params {
            Some(p) => Some(to_cstring("params", &p.to_json()?)?),
            None => None,
        };
        let params_ptr = params_c.as_ref().map_or(ptr::null(), |p| p.as_ptr());
        self.call(|c| unsafe { ffi::RTI_Connector_write(c, writer.entity.as_ptr(), params_ptr) })
    }

    fn clear(&self, writer: &NativeWriter) -> Result<()> {
        self.call(|c| unsafe { ffi::RTI_Connector_clear(c, writer.entity.as_ptr()) })
    }

    fn set_number(&self, writer: &NativeWriter, field: &str, value: f64) -> Result<()> {
        let field_c = to_cstring("field", field)?;
        self.call(|c| unsafe {
            ffi::RTI_Connector_set_number_into_samples(
                c,
                writer.entity.as_ptr(),
                field_c.as_ptr(),
                value as c_double,
            )
        })
    }

    fn set_boolean(&self, writer: &NativeWriter, field: &str, value: bool) -> Result<()> {
        let field_c = to_cstring("field", field)?;
        self.call(|c| unsafe {
            ffi::RTI_Connector_set_boolean_into_samples(
                c,
                writer.entity.as_ptr(),
                field_c.as_ptr(),
                c_int::from(value),
            )
        })
    }

    fn set_string(&self, writer: &NativeWriter, field: &str, value: &str) -> Result<()> {
        let field_c = to_cstring("field", field)?;
        let value_c = to_cstring("value", value)?;
        self.call(|c| unsafe {
            ffi::RTI_Connector_set_string_into_samples(
                c,
                writer.entity.as_ptr(),
                field_c.as_ptr(),
                value_c.as_ptr(),
            )
        })
    }

    fn set_json(&self, writer: &NativeWriter, json: &str) -> Result<()> {
        let json_c = to_cstring("json", json)?;
        self.call(|c| unsafe {
            ffi::RTI_Connector_set_json_instance(c, writer.entity.as_ptr(), json_c.as_ptr())
        })
    }

    fn read(&self, reader: &NativeReader) -> Result<()> {
        self.call(|c| unsafe { ffi::RTI_Connector_read(c, reader.entity.as_ptr()) })
    }

    fn take(&self, reader: &NativeReader) -> Result<()> {
        self.call(|c| unsafe { ffi::RTI_Connector_take(c, reader.entity.as_ptr()) })
    }

    fn sample_count(&self, reader: &NativeReader) -> Result<usize> {
        let mut count: c_double = 0.0;
        self.call(|c| unsafe {
            ffi::RTI_Connector_get_sample_count(c, reader.entity.as_ptr(), &mut count)
        })?;
        Ok(count as usize)
    }

    fn get_number(&self, reader: &NativeReader, index: usize, field: &str) -> Result<f64> {
        let field_c = to_cstring("field", field)?;
        let index = native_index(index)?;
        let mut value: c_double = 0.0;
        self.call(|c| unsafe {
            ffi::RTI_Connector_get_number_from_sample(
                c,
                &mut value,
                reader.entity.as_ptr(),
                index,
                field_c.as_ptr(),
            )
        })?;
        Ok(value)
    }

    fn get_boolean(&self, reader: &NativeReader, index: usize, field: &str) -> Result<bool> {
        let field_c = to_cstring("field", field)?;
        let index = native_index(index)?;
        let mut value: c_int = 0;
        self.call(|c| unsafe {
            ffi::RTI_Connector_get_boolean_from_sample(
                c,
                &mut value,
                reader.entity.as_ptr(),
                index,
                field_c.as_ptr(),
            )
        })?;
        Ok(value != 0)
    }

    fn get_string(&self, reader: &NativeReader, index: usize, field: &str) -> Result<String> {
        let field_c = to_cstring("field", field)?;
        let index = native_index(index)?;
        let _guard = MT_UNSAFE_FN.lock();
        let mut value: *mut c_char = ptr::null_mut();
        let ret = unsafe {
            ffi::RTI_Connector_get_string_from_sample(
                self.as_ptr(),
                &mut value,
                reader.entity.as_ptr(),
                index,
                field_c.as_ptr(),
            )
        };
        ret_val_to_err(ret, last_error)?;
        Ok(unsafe { take_string(value) }.unwrap_or_default())
    }

    fn get_json(&self, reader: &NativeReader, index: usize) -> Result<String> {
        let index = native_index(index)?;
        let _guard = MT_UNSAFE_FN.lock();
        let mut json: *mut c_char = ptr::null_mut();
        let ret = unsafe {
            ffi::RTI_Connector_get_json_sample(
                self.as_ptr(),
                reader.entity.as_ptr(),
                index,
                &mut json,
            )
        };
        ret_val_to_err(ret, last_error)?;
        unsafe { take_string(json) }.ok_or_else(|| Error::external("native library returned no sample"))
    }

    fn valid_data(&self, reader: &NativeReader, index: usize) -> Result<bool> {
        let index = native_index(index)?;
        let name = c"valid_data";
        let mut value: c_int = 0;
        self.call(|c| unsafe {
            ffi::RTI_Connector_get_boolean_from_infos(
                c,
                &mut value,
                reader.entity.as_ptr(),
                index,
                name.as_ptr(),
            )
        })?;
        Ok(value != 0)
    }

    fn wait(&self, timeout: Timeout) -> Result<bool> {
        let ret = unsafe { ffi::RTI_Connector_wait_for_data(self.as_ptr(), timeout.as_millis()) };
        wait_ret_val(ret, || {
            let _guard = MT_UNSAFE_FN.lock();
            last_error()
        })
    }

    fn wait_reader(&self, reader: &NativeReader, timeout: Timeout) -> Result<bool> {
        let ret = unsafe {
            ffi::RTI_Connector_wait_for_data_on_reader(reader.reader.as_ptr(), timeout.as_millis())
        };
        wait_ret_val(ret, || {
            let _guard = MT_UNSAFE_FN.lock();
            last_error()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_index_is_one_based() {
        assert_eq!(native_index(0).unwrap(), 1);
        assert_eq!(native_index(9).unwrap(), 10);
        assert!(native_index(usize::MAX).is_err());
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        match to_cstring("name", "bad\0name") {
            Err(Error::InvalidArgument { name, .. }) => assert_eq!(name, "name"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
