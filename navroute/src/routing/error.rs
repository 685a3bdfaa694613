//! Engine error type.

use thiserror::Error;

/// Fault raised by a routing engine during route computation.
///
/// Engines report expected outcomes through
/// [`RouterResultCode`](super::RouterResultCode); an `EngineError` is
/// reserved for faults the engine cannot express as a result code
/// (corrupted map data, a missing index, ...). The dispatcher converts it
/// to `InternalError` and forwards the message through the statistics
/// channel.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    /// Creates an engine error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roundtrip() {
        let error = EngineError::new("bad mwm");
        assert_eq!(error.message(), "bad mwm");
        assert_eq!(error.to_string(), "bad mwm");
    }
}
