//! # URI Rewriting
//!
//! Schemas declare `$id`s under the public console base URL and reference
//! each other relative to those ids. The validation engine resolves a
//! `$ref` to an absolute public URI and asks its retriever for it;
//! [`BundleRetriever`] rewrites that URI onto the offline bundle before
//! fetching, so resolution never touches the network.
//!
//! `https://console.redhat.com/api/schemas/core/v1/tag.json`
//! becomes `<offline base>/schemas/core/v1/tag.json`.
//!
//! URIs outside the public base pass through unchanged. Whether they can be
//! fetched is up to the bundle; a failure surfaces as a schema load error.

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use url::Url;

use crate::bundle::SchemaBundle;
use crate::error::SchemaLoadError;
use crate::metaschema::Metaschema;

/// Base URL every published schema `$id` starts with. Matched as a prefix,
/// never dereferenced.
pub const PUBLIC_BASE_URL: &str = "https://console.redhat.com/api";

/// Scheme the retriever rewrites. Other schemes are fetched as-is.
pub const REWRITTEN_SCHEME: &str = "https";

/// Maps public schema URIs onto the offline bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriRewriter {
    offline_base: String,
}

impl UriRewriter {
    /// A rewriter targeting an explicit offline base (no trailing slash).
    pub fn new(offline_base: impl Into<String>) -> Self {
        let mut offline_base = offline_base.into();
        while offline_base.ends_with('/') && !offline_base.ends_with("://") {
            offline_base.pop();
        }
        Self { offline_base }
    }

    /// A rewriter targeting `bundle`.
    ///
    /// # Errors
    ///
    /// Propagates [`SchemaBundle::offline_base`] failures.
    pub fn for_bundle(bundle: &SchemaBundle) -> Result<Self, SchemaLoadError> {
        Ok(Self::new(bundle.offline_base()?))
    }

    pub fn offline_base(&self) -> &str {
        &self.offline_base
    }

    /// Rewrite a public URI onto the bundle. Other URIs pass through.
    ///
    /// An empty trailing fragment (`...json#`) is dropped; any other
    /// fragment is kept.
    pub fn rewrite(&self, uri: &str) -> String {
        let uri = uri.strip_suffix('#').unwrap_or(uri);
        match uri.strip_prefix(PUBLIC_BASE_URL) {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '#', '?']) => {
                let rewritten = format!("{}{rest}", self.offline_base);
                tracing::debug!(from = uri, to = %rewritten, "rewrote schema uri");
                rewritten
            }
            _ => uri.to_string(),
        }
    }

    /// Rewrite `base`, then resolve `segment` against it.
    ///
    /// If the rewritten base cannot be parsed as a URL the two parts are
    /// concatenated and passed through.
    pub fn rewrite_relative(&self, base: &str, segment: &str) -> String {
        let base = self.rewrite(base);
        match Url::parse(&base).and_then(|b| b.join(segment)) {
            Ok(joined) => joined.to_string(),
            Err(_) => format!("{base}{segment}"),
        }
    }
}

/// The engine's retrieval strategy: rewrite, fetch from the bundle, and
/// neutralize the document with the metaschema.
#[derive(Debug, Clone)]
pub struct BundleRetriever {
    rewriter: UriRewriter,
    bundle: SchemaBundle,
    metaschema: Metaschema,
}

impl BundleRetriever {
    pub fn new(rewriter: UriRewriter, bundle: SchemaBundle, metaschema: Metaschema) -> Self {
        Self {
            rewriter,
            bundle,
            metaschema,
        }
    }

    pub fn rewriter(&self) -> &UriRewriter {
        &self.rewriter
    }

    /// Map a URI the engine asked for to the offline location to read.
    pub fn locate(&self, uri: &str) -> String {
        let https = uri
            .strip_prefix(REWRITTEN_SCHEME)
            .is_some_and(|rest| rest.starts_with(':'));
        if https {
            self.rewriter.rewrite(uri)
        } else {
            uri.strip_suffix('#').unwrap_or(uri).to_string()
        }
    }

    /// Fetch and parse the document behind `uri`, ready for compilation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLoadError::Retrieve`] if the document cannot be read
    /// and [`SchemaLoadError::InvalidJson`] if it is not valid JSON.
    pub fn load(&self, uri: &str) -> Result<Value, SchemaLoadError> {
        let location = self.locate(uri);
        let text = self
            .bundle
            .fetch(&location)
            .map_err(|e| SchemaLoadError::retrieve(uri, e))?;
        let mut document: Value = serde_json::from_str(&text)
            .map_err(|source| SchemaLoadError::InvalidJson { location, source })?;
        self.metaschema.neutralize(&mut document);
        Ok(document)
    }
}

impl Retrieve for BundleRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        self.load(uri.as_str()).map_err(Into::into)
    }
}
