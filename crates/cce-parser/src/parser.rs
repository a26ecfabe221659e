//! # Console Cloud Event Parser
//!
//! The read and write paths share one rule: a tree is only accepted after
//! schema defaults have been applied and the schema has validated it.
//!
//! ```text
//! read:  text ─▶ Value ─▶ defaults + validate ─▶ CloudEvent<D>
//! write: CloudEvent<D> ─▶ Value ─▶ defaults + validate ─▶ text
//! ```
//!
//! Validity is never cached on a typed value; an event mutated after
//! parsing is validated again when it is serialized.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use cce_core::{CloudEvent, ConsoleCloudEvent};
use cce_schema::{EventSchema, SchemaBundle, SchemaLoadError};

use crate::converter::ConverterConfig;
use crate::error::CloudEventError;

const PARSE_FAILED: &str = "Cloud event parsing failed";
const VALIDATE_FAILED: &str = "Cloud event validation failed";
const SERIALIZE_FAILED: &str = "Cloud event serialization failed";

/// Parses, validates and serializes console cloud events.
///
/// Construction loads and compiles the bundled schema, which is the only
/// expensive step; build one parser and reuse it. It is `Send + Sync`.
#[derive(Debug)]
pub struct ConsoleCloudEventParser {
    schema: EventSchema,
    converter: ConverterConfig,
}

impl ConsoleCloudEventParser {
    /// A parser over the embedded schema bundle with the default converter.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLoadError`] if the bundled schema cannot be loaded.
    pub fn new() -> Result<Self, SchemaLoadError> {
        Self::with_bundle(SchemaBundle::Embedded, ConverterConfig::default())
    }

    /// A parser over the embedded schema bundle with a custom converter.
    ///
    /// # Errors
    ///
    /// See [`ConsoleCloudEventParser::new`].
    pub fn with_converter(converter: ConverterConfig) -> Result<Self, SchemaLoadError> {
        Self::with_bundle(SchemaBundle::Embedded, converter)
    }

    /// A parser over an explicit schema bundle.
    ///
    /// # Errors
    ///
    /// See [`ConsoleCloudEventParser::new`].
    pub fn with_bundle(
        bundle: SchemaBundle,
        converter: ConverterConfig,
    ) -> Result<Self, SchemaLoadError> {
        Ok(Self::from_schema(EventSchema::load(&bundle)?, converter))
    }

    /// A parser over an already loaded schema.
    pub fn from_schema(schema: EventSchema, converter: ConverterConfig) -> Self {
        Self { schema, converter }
    }

    pub fn schema(&self) -> &EventSchema {
        &self.schema
    }

    pub fn converter(&self) -> &ConverterConfig {
        &self.converter
    }

    /// Parse an event with an untyped payload.
    ///
    /// # Errors
    ///
    /// See [`ConsoleCloudEventParser::parse_typed`].
    pub fn parse(&self, json: &str) -> Result<ConsoleCloudEvent, CloudEventError> {
        self.parse_typed(json)
    }

    /// Parse an event whose payload binds to `D`.
    ///
    /// Defaults declared by the schema are present on the result.
    ///
    /// # Errors
    ///
    /// - [`CloudEventError::Parsing`] if `json` is not well-formed, or the
    ///   validated tree does not bind to `CloudEvent<D>`.
    /// - [`CloudEventError::Validation`] if the tree breaks the schema.
    pub fn parse_typed<D: DeserializeOwned>(
        &self,
        json: &str,
    ) -> Result<CloudEvent<D>, CloudEventError> {
        let tree = self.read_validated(json, PARSE_FAILED)?;
        let event: CloudEvent<D> = self
            .converter
            .bind(tree)
            .map_err(|e| CloudEventError::parsing(PARSE_FAILED, json, e))?;
        tracing::debug!(id = %event.id, event_type = %event.event_type, "parsed cloud event");
        Ok(event)
    }

    /// Check `json` against the schema without binding it.
    ///
    /// # Errors
    ///
    /// Same categories as [`ConsoleCloudEventParser::parse_typed`], minus
    /// binding failures.
    pub fn validate(&self, json: &str) -> Result<(), CloudEventError> {
        self.read_validated(json, VALIDATE_FAILED).map(drop)
    }

    /// Serialize `event` with this parser's converter.
    ///
    /// # Errors
    ///
    /// See [`serialize`].
    pub fn to_json<D: Serialize>(&self, event: &CloudEvent<D>) -> Result<String, CloudEventError> {
        serialize(&self.schema, event, &self.converter)
    }

    /// The validated, defaulted JSON tree of `event`.
    ///
    /// # Errors
    ///
    /// See [`serialize`].
    pub fn to_value<D: Serialize>(&self, event: &CloudEvent<D>) -> Result<Value, CloudEventError> {
        validated_tree(&self.schema, event, &self.converter)
    }

    /// `syntax_message` labels malformed input; schema failures are always
    /// reported as validation failures.
    fn read_validated(&self, json: &str, syntax_message: &str) -> Result<Value, CloudEventError> {
        let mut tree = self
            .converter
            .read_tree(json)
            .map_err(|e| CloudEventError::parsing(syntax_message, json, e))?;
        self.schema
            .walk(&mut tree)
            .map_err(|violations| CloudEventError::validation(VALIDATE_FAILED, json, violations))?;
        Ok(tree)
    }
}

/// Serialize `event` to text after validating its JSON projection.
///
/// # Errors
///
/// Returns [`CloudEventError::Parsing`] if the event cannot be projected
/// to JSON, or if the projection breaks the schema (the violations are the
/// cause).
pub fn serialize<D: Serialize>(
    schema: &EventSchema,
    event: &CloudEvent<D>,
    converter: &ConverterConfig,
) -> Result<String, CloudEventError> {
    let tree = validated_tree(schema, event, converter)?;
    converter
        .render(&tree)
        .map_err(|e| CloudEventError::parsing(SERIALIZE_FAILED, tree.to_string(), e))
}

fn validated_tree<D: Serialize>(
    schema: &EventSchema,
    event: &CloudEvent<D>,
    converter: &ConverterConfig,
) -> Result<Value, CloudEventError> {
    let mut tree = converter.to_tree(event).map_err(|e| {
        let described = format!("CloudEvent {{ id: {}, type: {} }}", event.id, event.event_type);
        CloudEventError::parsing(SERIALIZE_FAILED, described, e)
    })?;
    schema
        .walk(&mut tree)
        .map_err(|violations| CloudEventError::parsing(SERIALIZE_FAILED, tree.to_string(), violations))?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parser() -> ConsoleCloudEventParser {
        ConsoleCloudEventParser::new().unwrap()
    }

    const MINIMAL: &str = r#"{"id":"1","type":"t","source":"s","time":"2024-01-01T00:00:00Z"}"#;

    #[test]
    fn test_parse_minimal_fills_defaults() {
        let event = parser().parse(MINIMAL).unwrap();
        assert_eq!(event.specversion, "1.0.2");
        assert_eq!(event.data, json!({}));
    }

    #[test]
    fn test_validate_missing_time() {
        let err = parser()
            .validate(r#"{"id":"1","type":"t","source":"s"}"#)
            .unwrap_err();
        assert!(err.is_validation());
        let violations = err.violations().unwrap();
        assert!(violations.iter().any(|v| v.message.contains("\"time\"")));
        assert!(err.to_string().starts_with("Cloud event validation failed for: "));
    }

    #[test]
    fn test_parse_reports_schema_failure_as_validation() {
        let err = parser()
            .parse(r#"{"id":"1","type":"t","source":"s"}"#)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Cloud event validation failed for: "));

        let err = parser().parse("{").unwrap_err();
        assert!(err.to_string().starts_with("Cloud event parsing failed for: "));
    }

    #[test]
    fn test_malformed_json_is_parsing_error() {
        let p = parser();
        assert!(p.parse("{\"id\":").unwrap_err().is_parsing());
        assert!(p.validate("not json").unwrap_err().is_parsing());
    }

    #[test]
    fn test_binding_failure_is_parsing_error() {
        #[derive(Debug, serde::Deserialize)]
        struct NeedsCount {
            #[allow(dead_code)]
            count: u32,
        }
        let err = parser().parse_typed::<NeedsCount>(MINIMAL).unwrap_err();
        assert!(err.is_parsing());
        assert_eq!(err.input(), Some(MINIMAL));
    }

    #[test]
    fn test_serialize_rejects_mutated_event() {
        let p = parser();
        let mut event = p.parse(MINIMAL).unwrap();
        event.id.clear();
        let err = p.to_json(&event).unwrap_err();
        assert!(err.is_parsing());
        assert!(err.violations().is_some());
    }

    #[test]
    fn test_to_value_round_trip() {
        let p = parser();
        let event = p.parse(MINIMAL).unwrap();
        let tree = p.to_value(&event).unwrap();
        assert_eq!(tree["type"], "t");
        assert_eq!(p.parse(&tree.to_string()).unwrap(), event);
    }

    #[test]
    fn test_parser_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConsoleCloudEventParser>();
    }
}
