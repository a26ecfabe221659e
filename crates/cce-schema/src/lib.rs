//! # cce-schema — Console Cloud Event Schema
//!
//! Loads the bundled console cloud event schema and validates JSON trees
//! against it without network access.
//!
//! ## Offline Resolution (`rewrite`, `bundle`)
//!
//! Published schemas carry `$id`s under `https://console.redhat.com/api`.
//! [`UriRewriter`] maps that prefix onto the offline [`SchemaBundle`]
//! (compiled in, or a directory on disk) and [`BundleRetriever`] plugs the
//! rewrite into the `jsonschema` engine as its retrieval strategy, so
//! relative `$ref` chains inside the bundle resolve exactly as they would
//! online.
//!
//! ## Dialect (`metaschema`)
//!
//! [`Metaschema::console`] is draft-07 with a `local-date-time` format and
//! documentation-only keywords neutralized.
//!
//! ## Defaults (`defaults`)
//!
//! [`ApplyDefaults`] selects which declared `default`s are filled into an
//! instance before validation.
//!
//! ## Crate Policy
//!
//! - Depends only on `cce-core` internally.
//! - All I/O happens in [`EventSchema::load`]; validation is pure.
//! - Schema `$id` and `$ref` URIs must never be changed without checking
//!   every reference in `schemas/`.

pub mod bundle;
pub mod defaults;
pub mod documents;
pub mod error;
pub mod loader;
pub mod metaschema;
pub mod rewrite;
pub mod violation;

pub use bundle::{SchemaBundle, ROOT_SCHEMA_PATH};
pub use defaults::{ApplyDefaults, DefaultsWalker};
pub use documents::{PreloadedRetriever, SchemaDocuments};
pub use error::SchemaLoadError;
pub use loader::EventSchema;
pub use metaschema::{Metaschema, DRAFT7_URI, LOCAL_DATE_TIME_FORMAT, NON_VALIDATING_KEYWORDS};
pub use rewrite::{BundleRetriever, UriRewriter, PUBLIC_BASE_URL};
pub use violation::{ValidationViolations, Violation};
