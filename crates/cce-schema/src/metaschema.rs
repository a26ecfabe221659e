//! # Console Metaschema
//!
//! The dialect the bundled schemas are written in: JSON Schema draft-07
//! with these deviations.
//!
//! - The identifier keyword is `$id`, and nothing else.
//! - `examples`, `$schema`, `definitions`, `$id`, `title`, `description`
//!   and `contentEncoding` never influence a validation outcome. Before
//!   compilation [`Metaschema::neutralize`] strips the ones the engine could
//!   act on. The identifier, `$schema` and `definitions` stay because
//!   reference resolution reads them.
//! - All built-in formats are asserted, plus `local-date-time`: a
//!   date-time with no offset or zone. Plain `date-time` still requires an
//!   offset, so the two formats partition timestamps.
//!
//! A `Metaschema` is an immutable value; [`Metaschema::options`] turns it
//! into engine options.

use jsonschema::{Draft, Retrieve, ValidationOptions};
use serde_json::Value;

use cce_core::is_local_date_time;

/// Draft the console dialect derives from.
pub const DRAFT7_URI: &str = "http://json-schema.org/draft-07/schema#";

/// Name of the custom timezone-less date-time format.
pub const LOCAL_DATE_TIME_FORMAT: &str = "local-date-time";

/// Keywords recognized by the dialect that never assert anything.
pub const NON_VALIDATING_KEYWORDS: &[&str] = &[
    "examples",
    "$schema",
    "definitions",
    "$id",
    "title",
    "description",
    "contentEncoding",
];

/// A custom format predicate.
pub type FormatCheck = fn(&str) -> bool;

/// Immutable dialect configuration for the validation engine.
#[derive(Debug, Clone)]
pub struct Metaschema {
    uri: &'static str,
    draft: Draft,
    id_keyword: &'static str,
    non_validating_keywords: Vec<&'static str>,
    formats: Vec<(&'static str, FormatCheck)>,
    assert_formats: bool,
}

impl Default for Metaschema {
    fn default() -> Self {
        Self::console()
    }
}

impl Metaschema {
    /// The dialect used by every bundled console schema.
    pub fn console() -> Self {
        Self {
            uri: DRAFT7_URI,
            draft: Draft::Draft7,
            id_keyword: "$id",
            non_validating_keywords: NON_VALIDATING_KEYWORDS.to_vec(),
            formats: vec![(LOCAL_DATE_TIME_FORMAT, is_local_date_time as FormatCheck)],
            assert_formats: true,
        }
    }

    pub fn uri(&self) -> &str {
        self.uri
    }

    pub fn draft(&self) -> Draft {
        self.draft
    }

    pub fn id_keyword(&self) -> &str {
        self.id_keyword
    }

    pub fn non_validating_keywords(&self) -> &[&'static str] {
        &self.non_validating_keywords
    }

    /// Names of the formats added on top of the engine's built-ins.
    pub fn custom_formats(&self) -> impl Iterator<Item = &str> + '_ {
        self.formats.iter().map(|(name, _)| *name)
    }

    /// Read the identifier of a schema document.
    pub fn schema_id<'a>(&self, schema: &'a Value) -> Option<&'a str> {
        schema.get(self.id_keyword).and_then(Value::as_str)
    }

    /// Engine options for this dialect, resolving references through `retriever`.
    pub fn options(&self, retriever: impl Retrieve + 'static) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(self.draft)
            .should_validate_formats(self.assert_formats)
            .with_retriever(retriever);
        for (name, check) in &self.formats {
            opts.with_format(*name, *check);
        }
        opts
    }

    /// Remove non-validating keywords from every schema object in `schema`.
    ///
    /// Only schema positions are visited, so a property that happens to be
    /// *named* `title` or `description` survives.
    pub fn neutralize(&self, schema: &mut Value) {
        let Value::Object(map) = schema else {
            return;
        };
        map.retain(|keyword, _| !self.is_stripped(keyword));

        for (keyword, child) in map.iter_mut() {
            match keyword.as_str() {
                "properties" | "patternProperties" | "definitions" | "dependencies" => {
                    if let Value::Object(children) = child {
                        for sub in children.values_mut() {
                            self.neutralize(sub);
                        }
                    }
                }
                "items" | "allOf" | "anyOf" | "oneOf" => match child {
                    Value::Array(children) => {
                        for sub in children {
                            self.neutralize(sub);
                        }
                    }
                    other => self.neutralize(other),
                },
                "additionalItems" | "additionalProperties" | "contains" | "propertyNames"
                | "if" | "then" | "else" | "not" => self.neutralize(child),
                _ => {}
            }
        }
    }

    fn is_stripped(&self, keyword: &str) -> bool {
        let structural =
            keyword == self.id_keyword || keyword == "$schema" || keyword == "definitions";
        !structural && self.non_validating_keywords.iter().any(|k| *k == keyword)
    }
}
