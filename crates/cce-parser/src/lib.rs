//! # cce-parser — Console Cloud Event Parser
//!
//! The public entry point for reading and writing console cloud events.
//!
//! ```rust
//! use cce_parser::ConsoleCloudEventParser;
//!
//! let parser = ConsoleCloudEventParser::new()?;
//! let event = parser.parse(
//!     r#"{"id":"1","type":"t","source":"s","time":"2024-01-01T00:00:00Z"}"#,
//! )?;
//! assert_eq!(event.specversion, "1.0.2"); // schema default
//! let json = parser.to_json(&event)?;
//! # let _ = json;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Policy
//!
//! - The schema is the single source of truth. There is no write-side
//!   validation logic beyond re-running the schema.
//! - Parsing and validation failures are distinct error categories so
//!   callers can word "malformed JSON" and "does not conform" differently.

pub mod converter;
pub mod error;
pub mod parser;

pub use cce_core::{CloudEvent, ConsoleCloudEvent};
pub use converter::ConverterConfig;
pub use error::{CloudEventError, ParsingCause};
pub use parser::{serialize, ConsoleCloudEventParser};
