//! # Reference Documents
//!
//! Every bundled document reachable from the root schema through `$ref`,
//! keyed by its absolute public URI (fragment removed). The set is read
//! from the bundle once: default application walks it, and
//! [`PreloadedRetriever`] hands the same documents to the validation engine.

use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use url::Url;

use crate::error::SchemaLoadError;
use crate::metaschema::Metaschema;
use crate::rewrite::BundleRetriever;

/// Keywords whose values are data, not schemas.
const DATA_KEYWORDS: &[&str] = &["enum", "const", "default", "examples"];

/// Metaschemas the engine ships with; never retrieved.
const BUILTIN_PREFIX: &str = "http://json-schema.org/";

/// Loaded schema documents keyed by absolute URI.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocuments {
    documents: HashMap<String, Value>,
}

impl SchemaDocuments {
    /// Load `root` and, transitively, every document it references.
    ///
    /// # Errors
    ///
    /// Fails on the first referenced document the retriever cannot load.
    pub fn preload(
        root_uri: &str,
        root: Value,
        retriever: &BundleRetriever,
        metaschema: &Metaschema,
    ) -> Result<Self, SchemaLoadError> {
        let mut documents = Self::default();
        let mut pending = vec![(normalize(root_uri), root)];

        while let Some((uri, document)) = pending.pop() {
            let base = metaschema
                .schema_id(&document)
                .map(normalize)
                .unwrap_or_else(|| uri.clone());

            let mut references = Vec::new();
            collect_refs(&document, &mut references);

            if base != uri {
                documents.documents.insert(base.clone(), document.clone());
            }
            documents.documents.insert(uri, document);

            for reference in references {
                let Some(target) = document_uri(&base, &reference) else {
                    tracing::debug!(%reference, %base, "skipping unparseable $ref");
                    continue;
                };
                if target.starts_with(BUILTIN_PREFIX)
                    || documents.contains(&target)
                    || pending.iter().any(|(u, _)| *u == target)
                {
                    continue;
                }
                let loaded = retriever.load(&target)?;
                pending.push((target, loaded));
            }
        }

        Ok(documents)
    }

    /// Returns the number of loaded documents (aliases included).
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }

    /// Look up a document by absolute URI.
    pub fn get(&self, uri: &str) -> Option<&Value> {
        self.documents.get(&normalize(uri))
    }

    /// URIs of all loaded documents, sorted.
    pub fn uris(&self) -> Vec<&str> {
        let mut uris: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        uris.sort_unstable();
        uris
    }

    /// Resolve `reference`, written in the document at `base`, to the URI of
    /// the document it lands in and the schema node it points at.
    pub fn resolve(&self, base: &str, reference: &str) -> Option<(String, &Value)> {
        let target = Url::parse(base).ok()?.join(reference).ok()?;
        let pointer = target.fragment().unwrap_or_default().to_string();
        let uri = without_fragment(target);
        let document = self.documents.get(&uri)?;
        let node = if pointer.is_empty() {
            document
        } else {
            document.pointer(&pointer)?
        };
        Some((uri, node))
    }
}

/// The engine's retrieval strategy once documents are preloaded.
///
/// Serves from the preloaded set and only falls back to the bundle for a
/// URI that was not reached by the `$ref` walk.
#[derive(Debug, Clone)]
pub struct PreloadedRetriever {
    documents: Arc<SchemaDocuments>,
    fallback: BundleRetriever,
}

impl PreloadedRetriever {
    pub fn new(documents: Arc<SchemaDocuments>, fallback: BundleRetriever) -> Self {
        Self {
            documents,
            fallback,
        }
    }

    /// The document behind `uri`, preloaded or fetched.
    ///
    /// # Errors
    ///
    /// Propagates [`BundleRetriever::load`] failures for URIs that were not
    /// preloaded.
    pub fn fetch(&self, uri: &str) -> Result<Value, SchemaLoadError> {
        match self.documents.get(uri) {
            Some(document) => Ok(document.clone()),
            None => {
                tracing::debug!(uri, "schema document was not preloaded");
                self.fallback.load(uri)
            }
        }
    }
}

impl Retrieve for PreloadedRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        self.fetch(uri.as_str()).map_err(Into::into)
    }
}

fn normalize(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(url) => without_fragment(url),
        Err(_) => uri.trim_end_matches('#').to_string(),
    }
}

fn without_fragment(mut url: Url) -> String {
    url.set_fragment(None);
    url.to_string()
}

fn document_uri(base: &str, reference: &str) -> Option<String> {
    let target = Url::parse(base).ok()?.join(reference).ok()?;
    Some(without_fragment(target))
}

fn collect_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (keyword, child) in map {
                if keyword == "$ref" {
                    if let Value::String(reference) = child {
                        out.push(reference.clone());
                    }
                } else if !DATA_KEYWORDS.contains(&keyword.as_str()) {
                    collect_refs(child, out);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_refs(item, out)),
        _ => {}
    }
}
