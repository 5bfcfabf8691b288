//! Common imports.

pub use crate::{
    Connector, Error, Input, Instance, Output, Result, Sample, Samples, Timeout, WriteAction,
    WriteParams,
};
