//! # Schema Load Errors
//!
//! Everything that can go wrong while building an [`crate::EventSchema`].
//! All of these are configuration failures: a parser cannot be constructed
//! without its schema, and there is no degraded mode.

use thiserror::Error;

/// Failure to read, parse, resolve or compile the bundled schema tree.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// A bundled document could not be read from its offline location.
    #[error("failed to read schema at {location}: {reason}")]
    Read {
        /// Offline location (file URL or bundle URI) that was read.
        location: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A bundled document is not valid JSON.
    #[error("schema at {location} is not valid JSON: {source}")]
    InvalidJson {
        /// Offline location of the malformed document.
        location: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A `$ref` target could not be resolved to a bundled document.
    #[error("failed to resolve schema reference {uri}: {reason}")]
    Retrieve {
        /// The reference as written in (or resolved from) the schema.
        uri: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The validation engine rejected the schema.
    #[error("failed to compile schema {schema_id}: {reason}")]
    Compile {
        /// The `$id` of the schema being compiled.
        schema_id: String,
        /// Reason reported by the engine.
        reason: String,
    },
}

impl SchemaLoadError {
    pub(crate) fn read(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn retrieve(uri: impl Into<String>, reason: impl ToString) -> Self {
        Self::Retrieve {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }
}
