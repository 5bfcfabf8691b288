use crate::error::{Error, Result};

/// Reject an empty identifier before it reaches a backend.
pub fn require_non_empty(name: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::empty_argument(name))
    } else {
        Ok(())
    }
}
