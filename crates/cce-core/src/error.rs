//! Error types for the event model.

use thiserror::Error;

/// Errors raised while constructing or reinterpreting event values.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The string is not a timezone-less `YYYY-MM-DDTHH:MM:SS[.fff]` value.
    #[error("invalid local date-time {0:?}: expected YYYY-MM-DDTHH:MM:SS[.fraction] without offset")]
    InvalidLocalDateTime(String),

    /// The event payload could not be bound to the requested type.
    #[error("payload conversion failed: {0}")]
    Payload(#[from] serde_json::Error),
}
