//! # Schema Defaults
//!
//! Fills declared `default`s into an instance before it is validated, so a
//! parsed event carries every field the schema defaults. Three scopes can
//! be toggled independently:
//!
//! - `property_defaults`: absent properties get their `default`.
//! - `null_property_defaults`: properties present as `null` get their `default`.
//! - `array_item_defaults`: `null` array items get the `items` schema's `default`.
//!
//! Defaults are found through `$ref` (across bundled documents), `allOf`,
//! `properties` and `items`, at any depth of the instance.

use serde_json::Value;

use crate::documents::SchemaDocuments;

/// Bound on consecutive `$ref` hops without descending into the instance.
const MAX_REF_HOPS: usize = 32;

/// Which declared defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyDefaults {
    pub property_defaults: bool,
    pub null_property_defaults: bool,
    pub array_item_defaults: bool,
}

impl ApplyDefaults {
    /// Apply every kind of default.
    pub const ALL: Self = Self {
        property_defaults: true,
        null_property_defaults: true,
        array_item_defaults: true,
    };

    /// Leave instances untouched.
    pub const NONE: Self = Self {
        property_defaults: false,
        null_property_defaults: false,
        array_item_defaults: false,
    };

    pub fn is_enabled(&self) -> bool {
        self.property_defaults || self.null_property_defaults || self.array_item_defaults
    }
}

impl Default for ApplyDefaults {
    fn default() -> Self {
        Self::ALL
    }
}

/// Walks an instance alongside its schema, inserting defaults.
#[derive(Debug, Clone, Copy)]
pub struct DefaultsWalker<'s> {
    documents: &'s SchemaDocuments,
    strategy: ApplyDefaults,
}

impl<'s> DefaultsWalker<'s> {
    pub fn new(documents: &'s SchemaDocuments, strategy: ApplyDefaults) -> Self {
        Self {
            documents,
            strategy,
        }
    }

    /// Apply defaults from the document at `root_uri` to `instance`.
    pub fn apply(&self, root_uri: &str, instance: &mut Value) {
        if !self.strategy.is_enabled() {
            return;
        }
        match self.documents.get(root_uri) {
            Some(root) => self.apply_schema(root_uri, root, instance, 0),
            None => tracing::warn!(root_uri, "no schema document to take defaults from"),
        }
    }

    fn apply_schema(&self, base: &str, schema: &'s Value, instance: &mut Value, hops: usize) {
        let Value::Object(keywords) = schema else {
            return;
        };

        // Draft-07: siblings of `$ref` are ignored.
        if let Some(Value::String(reference)) = keywords.get("$ref") {
            if hops >= MAX_REF_HOPS {
                tracing::warn!(%reference, "giving up on $ref chain while applying defaults");
                return;
            }
            match self.documents.resolve(base, reference) {
                Some((uri, target)) => self.apply_schema(&uri, target, instance, hops + 1),
                None => tracing::debug!(%reference, base, "unresolved $ref while applying defaults"),
            }
            return;
        }

        if let Some(Value::Array(all_of)) = keywords.get("allOf") {
            for sub in all_of {
                self.apply_schema(base, sub, instance, hops);
            }
        }

        match instance {
            Value::Object(object) => {
                let Some(Value::Object(properties)) = keywords.get("properties") else {
                    return;
                };
                for (name, property_schema) in properties {
                    let default = self.declared_default(base, property_schema, 0);
                    if !object.contains_key(name) {
                        if let Some(default) = default.filter(|_| self.strategy.property_defaults) {
                            object.insert(name.clone(), default.clone());
                        }
                    } else if let Some(value) = object.get_mut(name) {
                        if value.is_null() && self.strategy.null_property_defaults {
                            if let Some(default) = default {
                                *value = default.clone();
                            }
                        }
                    }
                    if let Some(value) = object.get_mut(name) {
                        self.apply_schema(base, property_schema, value, 0);
                    }
                }
            }
            Value::Array(items) => match keywords.get("items") {
                Some(Value::Array(positional)) => {
                    for (item, item_schema) in items.iter_mut().zip(positional) {
                        self.apply_item(base, item_schema, item);
                    }
                }
                Some(item_schema) => {
                    for item in items.iter_mut() {
                        self.apply_item(base, item_schema, item);
                    }
                }
                None => {}
            },
            _ => {}
        }
    }

    fn apply_item(&self, base: &str, item_schema: &'s Value, item: &mut Value) {
        if item.is_null() && self.strategy.array_item_defaults {
            if let Some(default) = self.declared_default(base, item_schema, 0) {
                *item = default.clone();
            }
        }
        self.apply_schema(base, item_schema, item, 0);
    }

    /// The `default` a schema declares, looking through `$ref`.
    fn declared_default(&self, base: &str, schema: &'s Value, hops: usize) -> Option<&'s Value> {
        let keywords = schema.as_object()?;
        if let Some(default) = keywords.get("default") {
            return Some(default);
        }
        let reference = keywords.get("$ref")?.as_str()?;
        if hops >= MAX_REF_HOPS {
            return None;
        }
        let (uri, target) = self.documents.resolve(base, reference)?;
        self.declared_default(&uri, target, hops + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::SchemaBundle;
    use crate::metaschema::Metaschema;
    use crate::rewrite::{BundleRetriever, UriRewriter};
    use serde_json::json;

    const EVENTS: &str = "https://console.redhat.com/api/schemas/events/v1/events.json";

    fn documents() -> SchemaDocuments {
        let bundle = SchemaBundle::Embedded;
        let retriever = BundleRetriever::new(
            UriRewriter::for_bundle(&bundle).unwrap(),
            bundle,
            Metaschema::console(),
        );
        let root = retriever.load(EVENTS).unwrap();
        SchemaDocuments::preload(EVENTS, root, &retriever, &Metaschema::console()).unwrap()
    }

    #[test]
    fn test_absent_properties_defaulted() {
        let documents = documents();
        let mut event = json!({"id": "1", "type": "t", "source": "s"});
        DefaultsWalker::new(&documents, ApplyDefaults::ALL).apply(EVENTS, &mut event);
        assert_eq!(event["specversion"], "1.0.2");
        assert_eq!(event["data"], json!({}));
        assert!(event.get("time").is_none(), "no default declared for time");
    }

    #[test]
    fn test_defaults_follow_refs_across_documents() {
        let documents = documents();
        let mut event = json!({
            "data": {"system": {"inventory_id": "x", "tags": [{"key": "env"}]}}
        });
        DefaultsWalker::new(&documents, ApplyDefaults::ALL).apply(EVENTS, &mut event);
        assert_eq!(
            event["data"]["system"]["tags"][0],
            json!({"namespace": "insights-client", "key": "env"})
        );
    }

    #[test]
    fn test_absent_array_defaulted() {
        let documents = documents();
        let mut event = json!({"data": {"system": {"inventory_id": "x"}}});
        DefaultsWalker::new(&documents, ApplyDefaults::ALL).apply(EVENTS, &mut event);
        assert_eq!(event["data"]["system"]["tags"], json!([]));
    }

    #[test]
    fn test_null_property_defaulted() {
        let documents = documents();
        let mut event = json!({"specversion": null});
        DefaultsWalker::new(&documents, ApplyDefaults::ALL).apply(EVENTS, &mut event);
        assert_eq!(event["specversion"], "1.0.2");
    }

    #[test]
    fn test_null_array_items_defaulted() {
        let documents = documents();
        let mut event = json!({
            "data": {"system": {"inventory_id": "x", "groups": ["prod", null]}}
        });
        DefaultsWalker::new(&documents, ApplyDefaults::ALL).apply(EVENTS, &mut event);
        assert_eq!(event["data"]["system"]["groups"], json!(["prod", "ungrouped"]));
    }

    #[test]
    fn test_scopes_toggle_independently() {
        let documents = documents();
        let only_absent = ApplyDefaults {
            property_defaults: true,
            null_property_defaults: false,
            array_item_defaults: false,
        };
        let mut event = json!({
            "specversion": null,
            "data": {"system": {"inventory_id": "x", "groups": [null]}}
        });
        DefaultsWalker::new(&documents, only_absent).apply(EVENTS, &mut event);
        assert!(event["specversion"].is_null());
        assert_eq!(event["data"]["system"]["groups"], json!([null]));
        assert_eq!(event["data"]["system"]["tags"], json!([]));
    }

    #[test]
    fn test_none_leaves_instance_untouched() {
        let documents = documents();
        let mut event = json!({"id": "1"});
        DefaultsWalker::new(&documents, ApplyDefaults::NONE).apply(EVENTS, &mut event);
        assert_eq!(event, json!({"id": "1"}));
    }

    #[test]
    fn test_present_values_not_overwritten() {
        let documents = documents();
        let mut event = json!({"specversion": "1.0", "data": {"k": 1}});
        DefaultsWalker::new(&documents, ApplyDefaults::ALL).apply(EVENTS, &mut event);
        assert_eq!(event["specversion"], "1.0");
        assert_eq!(event["data"], json!({"k": 1}));
    }

    #[test]
    fn test_wrong_instance_types_ignored() {
        let documents = documents();
        let mut event = json!({"data": "not an object"});
        DefaultsWalker::new(&documents, ApplyDefaults::ALL).apply(EVENTS, &mut event);
        assert_eq!(event["data"], "not an object");
    }
}
