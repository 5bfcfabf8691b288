//! Optional parameters of a write.

use serde::{Deserialize, Serialize};

/// What a write does to the instance identified by the sample's key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    /// Publish the sample.
    #[default]
    Write,
    /// Dispose the instance.
    Dispose,
    /// Unregister the instance.
    Unregister,
}

/// Parameters passed along with a write.
///
/// Serialized to JSON for the native call, e.g.
/// `{"action":"dispose","source_timestamp":1000}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteParams {
    /// The write action.
    pub action: WriteAction,
    /// Source timestamp in nanoseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_timestamp: Option<i64>,
}

impl WriteParams {
    /// Parameters that dispose the instance.
    pub fn dispose() -> Self {
        WriteParams {
            action: WriteAction::Dispose,
            ..Default::default()
        }
    }

    /// Parameters that unregister the instance.
    pub fn unregister() -> Self {
        WriteParams {
            action: WriteAction::Unregister,
            ..Default::default()
        }
    }

    /// Set the source timestamp.
    pub fn with_source_timestamp(mut self, nanos: i64) -> Self {
        self.source_timestamp = Some(nanos);
        self
    }

    /// JSON form accepted by the native `write` call.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
