//! Return codes of the native library.

use connector_core::{Error, Result};
use std::fmt;

pub const RETCODE_OK: i32 = 0;
pub const RETCODE_ERROR: i32 = 1;
pub const RETCODE_UNSUPPORTED: i32 = 2;
pub const RETCODE_BAD_PARAMETER: i32 = 3;
pub const RETCODE_PRECONDITION_NOT_MET: i32 = 4;
pub const RETCODE_OUT_OF_RESOURCES: i32 = 5;
pub const RETCODE_NOT_ENABLED: i32 = 6;
pub const RETCODE_IMMUTABLE_POLICY: i32 = 7;
pub const RETCODE_INCONSISTENT_POLICY: i32 = 8;
pub const RETCODE_ALREADY_DELETED: i32 = 9;
pub const RETCODE_TIMEOUT: i32 = 10;
pub const RETCODE_NO_DATA: i32 = 11;
pub const RETCODE_ILLEGAL_OPERATION: i32 = 12;

/// A non-OK return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetCodeErr(pub i32);

impl fmt::Display for RetCodeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            RETCODE_ERROR => "ERROR",
            RETCODE_UNSUPPORTED => "UNSUPPORTED",
            RETCODE_BAD_PARAMETER => "BAD_PARAMETER",
            RETCODE_PRECONDITION_NOT_MET => "PRECONDITION_NOT_MET",
            RETCODE_OUT_OF_RESOURCES => "OUT_OF_RESOURCES",
            RETCODE_NOT_ENABLED => "NOT_ENABLED",
            RETCODE_IMMUTABLE_POLICY => "IMMUTABLE_POLICY",
            RETCODE_INCONSISTENT_POLICY => "INCONSISTENT_POLICY",
            RETCODE_ALREADY_DELETED => "ALREADY_DELETED",
            RETCODE_TIMEOUT => "TIMEOUT",
            RETCODE_NO_DATA => "NO_DATA",
            RETCODE_ILLEGAL_OPERATION => "ILLEGAL_OPERATION",
            _ => return write!(f, "unknown return code {}", self.0),
        };
        write!(f, "DDS_RETCODE_{name}")
    }
}

impl std::error::Error for RetCodeErr {}

/// Convert a C-style return value to a Rust-style value.
///
/// `last_error` is consulted only on failure, to attach the message the
/// native library recorded for it.
#[cfg_attr(not(rti_connector), allow(dead_code))]
pub(crate) fn ret_val_to_err(n: i32, last_error: impl FnOnce() -> Option<String>) -> Result<()> {
    match n {
        RETCODE_OK => Ok(()),
        RETCODE_TIMEOUT => Err(Error::Timeout),
        n => Err(external(RetCodeErr(n), last_error())),
    }
}

/// Like [`ret_val_to_err`], for wait calls: a timeout is `Ok(false)`.
#[cfg_attr(not(rti_connector), allow(dead_code))]
pub(crate) fn wait_ret_val(n: i32, last_error: impl FnOnce() -> Option<String>) -> Result<bool> {
    match ret_val_to_err(n, last_error) {
        Ok(()) => Ok(true),
        Err(Error::Timeout) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg_attr(not(rti_connector), allow(dead_code))]
fn external(code: RetCodeErr, message: Option<String>) -> Error {
    match message {
        Some(msg) if !msg.is_empty() => Error::External(format!("{code}: {msg}")),
        _ => Error::External(code.to_string()),
    }
}
