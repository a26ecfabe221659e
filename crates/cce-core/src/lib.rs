//! # cce-core — Console Cloud Event Types
//!
//! Typed in-memory representation of console cloud events. The shape of
//! every type here mirrors the bundled JSON Schema in `cce-schema`; the
//! schema is the source of truth for what a well-formed event is, these
//! types only bind already-validated JSON trees.
//!
//! ## Key Types
//!
//! - [`CloudEvent<D>`] — the envelope (`id`, `source`, `specversion`,
//!   `type`, `time`, ...) generic over its `data` payload.
//! - [`ConsoleCloudEvent`] — the default envelope with an untyped
//!   `serde_json::Value` payload.
//! - [`RhelSystem`], [`SystemData`], [`Tag`] — payload types for the
//!   bundled `core/v1` schemas.
//! - [`LocalDateTime`] — a date-time without offset or zone, serialized
//!   in the `local-date-time` schema format.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cce-*` crates (leaf of the DAG).
//! - No validation logic beyond what `serde` binding needs. Structural
//!   validity is decided by the schema, never by these types.

pub mod error;
pub mod event;
pub mod payload;
pub mod temporal;

pub use error::CoreError;
pub use event::{CloudEvent, ConsoleCloudEvent, SPEC_VERSION};
pub use payload::{RhelSystem, SystemData, Tag};
pub use temporal::{is_local_date_time, LocalDateTime};
