//! # Event Schema Loader
//!
//! Builds the one compiled validator a parser needs. Construction does all
//! of the I/O: the root document is read from the bundle, every referenced
//! document is preloaded through the rewriting retriever, and the root is
//! compiled with the console metaschema. The engine resolves references
//! from the preloaded documents, so each document is read once. After
//! that an [`EventSchema`] is immutable and only does in-memory work.
//!
//! ## Thread Safety
//!
//! `EventSchema` is `Send + Sync`; share one instance across threads.

use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use serde_json::Value;

use crate::bundle::{SchemaBundle, ROOT_SCHEMA_PATH};
use crate::defaults::{ApplyDefaults, DefaultsWalker};
use crate::documents::{PreloadedRetriever, SchemaDocuments};
use crate::error::SchemaLoadError;
use crate::metaschema::Metaschema;
use crate::rewrite::{BundleRetriever, UriRewriter, PUBLIC_BASE_URL};
use crate::violation::{ValidationViolations, Violation};

/// The compiled console event schema.
pub struct EventSchema {
    schema_id: String,
    validator: Validator,
    documents: Arc<SchemaDocuments>,
    rewriter: UriRewriter,
    metaschema: Metaschema,
    defaults: ApplyDefaults,
}

impl fmt::Debug for EventSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSchema")
            .field("schema_id", &self.schema_id)
            .field("offline_base", &self.rewriter.offline_base())
            .field("document_count", &self.documents.len())
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl EventSchema {
    /// Load the event schema from `bundle` with the console metaschema and
    /// every default scope enabled.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaLoadError`] if any bundled document is missing or
    /// malformed, or if the engine rejects the schema.
    pub fn load(bundle: &SchemaBundle) -> Result<Self, SchemaLoadError> {
        Self::load_with(bundle, Metaschema::console(), ApplyDefaults::default())
    }

    /// Load the event schema with an explicit metaschema and default strategy.
    ///
    /// # Errors
    ///
    /// See [`EventSchema::load`].
    pub fn load_with(
        bundle: &SchemaBundle,
        metaschema: Metaschema,
        defaults: ApplyDefaults,
    ) -> Result<Self, SchemaLoadError> {
        let rewriter = UriRewriter::for_bundle(bundle)?;
        let location = bundle.root_location()?;
        let text = bundle.fetch(&location)?;
        let mut root: Value = serde_json::from_str(&text).map_err(|source| {
            SchemaLoadError::InvalidJson {
                location: location.clone(),
                source,
            }
        })?;
        metaschema.neutralize(&mut root);

        let schema_id = metaschema
            .schema_id(&root)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{PUBLIC_BASE_URL}{ROOT_SCHEMA_PATH}"));

        let retriever = BundleRetriever::new(rewriter.clone(), bundle.clone(), metaschema.clone());
        let documents = Arc::new(SchemaDocuments::preload(
            &schema_id,
            root.clone(),
            &retriever,
            &metaschema,
        )?);

        let engine_retriever = PreloadedRetriever::new(Arc::clone(&documents), retriever);
        let validator = metaschema.options(engine_retriever).build(&root).map_err(|e| {
            SchemaLoadError::Compile {
                schema_id: schema_id.clone(),
                reason: e.to_string(),
            }
        })?;

        tracing::info!(
            schema_id = %schema_id,
            location = %location,
            documents = documents.len(),
            "loaded event schema"
        );

        Ok(Self {
            schema_id,
            validator,
            documents,
            rewriter,
            metaschema,
            defaults,
        })
    }

    /// The `$id` of the root schema.
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn rewriter(&self) -> &UriRewriter {
        &self.rewriter
    }

    pub fn metaschema(&self) -> &Metaschema {
        &self.metaschema
    }

    pub fn defaults(&self) -> ApplyDefaults {
        self.defaults
    }

    /// Every document reachable from the root schema.
    pub fn documents(&self) -> &SchemaDocuments {
        &self.documents
    }

    /// Validate `instance`, reporting every violation in engine order.
    ///
    /// # Errors
    ///
    /// Returns the full list of violations if `instance` is invalid.
    pub fn validate(&self, instance: &Value) -> Result<(), ValidationViolations> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(Violation::from)
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = violations.len(), "instance failed schema validation");
            Err(ValidationViolations::new(violations))
        }
    }

    /// Fill declared defaults into `instance` in place.
    pub fn apply_defaults(&self, instance: &mut Value) {
        DefaultsWalker::new(&self.documents, self.defaults).apply(&self.schema_id, instance);
    }

    /// Apply defaults, then validate.
    ///
    /// # Errors
    ///
    /// See [`EventSchema::validate`].
    pub fn walk(&self, instance: &mut Value) -> Result<(), ValidationViolations> {
        self.apply_defaults(instance);
        self.validate(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> EventSchema {
        EventSchema::load(&SchemaBundle::Embedded).unwrap()
    }

    fn minimal() -> Value {
        json!({"id": "1", "type": "t", "source": "s", "time": "2024-01-01T00:00:00Z"})
    }

    #[test]
    fn test_load_embedded() {
        let schema = schema();
        assert_eq!(
            schema.schema_id(),
            "https://console.redhat.com/api/schemas/events/v1/events.json"
        );
        assert_eq!(schema.documents().len(), 3);
        assert_eq!(schema.rewriter().offline_base(), "bundle://");
    }

    #[test]
    fn test_load_source_tree() {
        let schema = EventSchema::load(&SchemaBundle::source_tree()).unwrap();
        assert!(schema.rewriter().offline_base().starts_with("file://"));
        schema.validate(&minimal()).unwrap();
    }

    #[test]
    fn test_missing_time_reported() {
        let err = schema()
            .walk(&mut json!({"id": "1", "type": "t", "source": "s"}))
            .unwrap_err();
        assert!(err.iter().any(|v| v.message.contains("time")), "got: {err}");
    }

    #[test]
    fn test_walk_defaults_then_validates() {
        let mut event = minimal();
        schema().walk(&mut event).unwrap();
        assert_eq!(event["specversion"], "1.0.2");
        assert_eq!(event["data"], json!({}));
    }

    #[test]
    fn test_validate_does_not_default() {
        let schema = schema();
        let mut event = minimal();
        event["data"] = json!({"system": {"inventory_id": "x", "tags": [{"key": "env"}]}});
        let err = schema.validate(&event).unwrap_err();
        assert!(err.iter().any(|v| v.message.contains("namespace")));
        schema.walk(&mut event).unwrap();
    }

    #[test]
    fn test_all_violations_reported() {
        let mut event = json!({"id": "", "type": 3, "source": "s", "time": "yesterday"});
        let err = schema().walk(&mut event).unwrap_err();
        assert!(err.len() >= 3, "got: {err}");
    }

    #[test]
    fn test_nested_reference_violation() {
        let mut event = minimal();
        event["data"] = json!({"system": {"inventory_id": "x", "check_in": "2024-01-01T00:00:00Z"}});
        let err = schema().walk(&mut event).unwrap_err();
        let v = &err.violations()[0];
        assert_eq!(v.instance_path, "/data/system/check_in");
    }

    #[test]
    fn test_defaults_disabled() {
        let schema = EventSchema::load_with(
            &SchemaBundle::Embedded,
            Metaschema::console(),
            ApplyDefaults::NONE,
        )
        .unwrap();
        let mut event = minimal();
        schema.walk(&mut event).unwrap();
        assert!(event.get("specversion").is_none());
    }

    #[test]
    fn test_missing_directory_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EventSchema::load(&SchemaBundle::directory(dir.path())).unwrap_err();
        assert!(matches!(err, SchemaLoadError::Read { .. }));
    }

    #[test]
    fn test_compiles_without_rereading_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let schemas = dir.path().join("schemas");
        for doc in ["events/v1/events.json", "core/v1/rhel_system.json", "core/v1/tag.json"] {
            let target = schemas.join(doc);
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            let source = SchemaBundle::Embedded
                .fetch(&format!("bundle:///schemas/{doc}"))
                .unwrap();
            std::fs::write(target, source).unwrap();
        }
        let bundle = SchemaBundle::directory(dir.path());
        let retriever = BundleRetriever::new(
            UriRewriter::for_bundle(&bundle).unwrap(),
            bundle.clone(),
            Metaschema::console(),
        );
        let root = retriever
            .load("https://console.redhat.com/api/schemas/events/v1/events.json")
            .unwrap();
        let documents = Arc::new(
            SchemaDocuments::preload(
                "https://console.redhat.com/api/schemas/events/v1/events.json",
                root.clone(),
                &retriever,
                &Metaschema::console(),
            )
            .unwrap(),
        );
        std::fs::remove_dir_all(&schemas).unwrap();

        let validator = Metaschema::console()
            .options(PreloadedRetriever::new(documents, retriever))
            .build(&root)
            .unwrap();
        let mut event = minimal();
        event["data"] = json!({"system": {"inventory_id": "x", "check_in": "2024-01-01T00:00:00Z"}});
        assert!(!validator.is_valid(&event));
    }

    #[test]
    fn test_schema_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventSchema>();
    }
}
