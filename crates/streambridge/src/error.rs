//! Error types for the stream bridge.

use thiserror::Error;

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors that can occur while bridging between the host stream protocol
/// and blocking readers.
///
/// End of stream is not an error on either side: the source adapter reports
/// it as `Ok(0)` from `read`, the sink adapter as a `close` call on the
/// controller.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// The host stream reported a failure while settling a pull.
    #[error("host stream error: {0}")]
    Host(String),

    /// The settle handle was dropped without delivering an outcome.
    #[error("pull abandoned: settle handle dropped without an outcome")]
    Abandoned,

    /// The underlying synchronous source failed to produce bytes.
    #[error("source read error: {0}")]
    Source(String),

    /// The underlying synchronous source failed while being released.
    #[error("source close error: {0}")]
    Close(String),
}
