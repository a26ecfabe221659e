//! # Schema Bundle
//!
//! The offline copy of the published schema tree. Every document lives at
//! the same relative path it has under the public base URL, so a `$ref`
//! chain that works online works unchanged against the bundle once the
//! base has been swapped (see [`crate::rewrite`]).
//!
//! Two locations are supported:
//!
//! - [`SchemaBundle::Embedded`] — the documents under this crate's
//!   `schemas/` directory, compiled into the binary. Addressed with
//!   `bundle:///schemas/...` URIs.
//! - [`SchemaBundle::Directory`] — a directory on disk that contains a
//!   `schemas/` tree. Addressed with `file://` URLs.
//!
//! The offline base is derived the same way for both: take the location of
//! the known root document and strip [`ROOT_SCHEMA_PATH`] from its end.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::SchemaLoadError;

/// Path of the root event schema, relative to the bundle root.
pub const ROOT_SCHEMA_PATH: &str = "/schemas/events/v1/events.json";

/// URI prefix of documents compiled into the binary.
const EMBEDDED_PREFIX: &str = "bundle://";

static EMBEDDED_DOCUMENTS: &[(&str, &str)] = &[
    (
        "/schemas/events/v1/events.json",
        include_str!("../schemas/events/v1/events.json"),
    ),
    (
        "/schemas/core/v1/rhel_system.json",
        include_str!("../schemas/core/v1/rhel_system.json"),
    ),
    (
        "/schemas/core/v1/tag.json",
        include_str!("../schemas/core/v1/tag.json"),
    ),
];

/// Where the offline schema tree is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchemaBundle {
    /// Documents compiled into the binary.
    #[default]
    Embedded,
    /// A directory containing `schemas/events/v1/events.json`.
    Directory(PathBuf),
}

impl SchemaBundle {
    /// A bundle rooted at `root` on the filesystem.
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self::Directory(root.into())
    }

    /// The in-tree `schemas/` directory of this crate, read from disk.
    pub fn source_tree() -> Self {
        Self::Directory(PathBuf::from(env!("CARGO_MANIFEST_DIR")))
    }

    /// Location of the root document.
    ///
    /// # Errors
    ///
    /// For directory bundles, returns [`SchemaLoadError::Read`] if the root
    /// document does not exist.
    pub fn root_location(&self) -> Result<String, SchemaLoadError> {
        match self {
            Self::Embedded => Ok(format!("{EMBEDDED_PREFIX}{ROOT_SCHEMA_PATH}")),
            Self::Directory(root) => {
                let path = root.join(ROOT_SCHEMA_PATH.trim_start_matches('/'));
                let path = path
                    .canonicalize()
                    .map_err(|e| SchemaLoadError::read(path.display().to_string(), e))?;
                Url::from_file_path(&path)
                    .map(String::from)
                    .map_err(|()| {
                        SchemaLoadError::read(path.display().to_string(), "not an absolute path")
                    })
            }
        }
    }

    /// The root of the bundle as a URI prefix, without trailing slash.
    ///
    /// # Errors
    ///
    /// Propagates [`SchemaBundle::root_location`] failures.
    pub fn offline_base(&self) -> Result<String, SchemaLoadError> {
        let location = self.root_location()?;
        location
            .strip_suffix(ROOT_SCHEMA_PATH)
            .map(str::to_string)
            .ok_or_else(|| {
                SchemaLoadError::read(
                    location.as_str(),
                    format!("location does not end with {ROOT_SCHEMA_PATH}"),
                )
            })
    }

    /// Read the document at an offline location.
    ///
    /// Embedded bundles serve `bundle://` URIs; directory bundles serve
    /// `file://` URLs that stay inside the bundle root.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLoadError::Read`] if the location is not served by
    /// this bundle or cannot be read.
    pub fn fetch(&self, location: &str) -> Result<String, SchemaLoadError> {
        match self {
            Self::Embedded => {
                let path = location.strip_prefix(EMBEDDED_PREFIX).ok_or_else(|| {
                    SchemaLoadError::read(location, "not a bundled schema location")
                })?;
                EMBEDDED_DOCUMENTS
                    .iter()
                    .find(|(p, _)| *p == path)
                    .map(|(_, text)| (*text).to_string())
                    .ok_or_else(|| SchemaLoadError::read(location, "no such bundled document"))
            }
            Self::Directory(root) => {
                let path = file_location(location)?;
                ensure_within(root, &path, location)?;
                std::fs::read_to_string(&path).map_err(|e| SchemaLoadError::read(location, e))
            }
        }
    }
}

fn file_location(location: &str) -> Result<PathBuf, SchemaLoadError> {
    let url = Url::parse(location).map_err(|e| SchemaLoadError::read(location, e))?;
    if url.scheme() != "file" {
        return Err(SchemaLoadError::read(
            location,
            format!("no offline resource for scheme {:?}", url.scheme()),
        ));
    }
    url.to_file_path()
        .map_err(|()| SchemaLoadError::read(location, "not a local file path"))
}

fn ensure_within(root: &Path, path: &Path, location: &str) -> Result<(), SchemaLoadError> {
    let root = root
        .canonicalize()
        .map_err(|e| SchemaLoadError::read(root.display().to_string(), e))?;
    let path = path
        .canonicalize()
        .map_err(|e| SchemaLoadError::read(location, e))?;
    if path.starts_with(&root) {
        Ok(())
    } else {
        Err(SchemaLoadError::read(location, "outside of the schema bundle"))
    }
}
