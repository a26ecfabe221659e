//! # JSON Converter Configuration
//!
//! How typed events are turned into JSON trees and text. Binding itself is
//! plain `serde`; the configuration only covers output rendering and null
//! handling on the write path.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Converter settings shared by every call of a parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Render multi-line, indented JSON.
    pub pretty: bool,
    /// Drop object members whose value is `null` before validating.
    pub omit_nulls: bool,
}

impl ConverterConfig {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    /// Parse JSON text into a generic tree.
    pub fn read_tree(&self, text: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Bind a tree to a typed value.
    pub fn bind<T: DeserializeOwned>(&self, tree: Value) -> Result<T, serde_json::Error> {
        serde_json::from_value(tree)
    }

    /// Project a typed value onto a generic tree.
    pub fn to_tree<T: Serialize>(&self, value: &T) -> Result<Value, serde_json::Error> {
        let mut tree = serde_json::to_value(value)?;
        if self.omit_nulls {
            strip_nulls(&mut tree);
        }
        Ok(tree)
    }

    /// Render a tree as text.
    pub fn render(&self, tree: &Value) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(tree)
        } else {
            serde_json::to_string(tree)
        }
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_compact_and_pretty() {
        let tree = json!({"a": 1});
        assert_eq!(ConverterConfig::default().render(&tree).unwrap(), r#"{"a":1}"#);
        assert!(ConverterConfig::pretty().render(&tree).unwrap().contains('\n'));
    }

    #[test]
    fn test_omit_nulls_recurses() {
        let converter = ConverterConfig {
            omit_nulls: true,
            ..ConverterConfig::default()
        };
        let tree = converter
            .to_tree(&json!({"a": null, "b": {"c": null, "d": 1}, "e": [null, {"f": null}]}))
            .unwrap();
        assert_eq!(tree, json!({"b": {"d": 1}, "e": [null, {}]}));
    }

    #[test]
    fn test_nulls_kept_by_default() {
        let tree = ConverterConfig::default().to_tree(&json!({"a": null})).unwrap();
        assert_eq!(tree, json!({"a": null}));
    }
}
