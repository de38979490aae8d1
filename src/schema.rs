//! JSON Schema document types and loading.
//!
//! Only the subset of JSON Schema the generator understands is modelled:
//! `$ref`, `type`, `items`, `properties`, `additionalProperties`,
//! `definitions`, `enum`, `required`, `default` and `description`. Any other
//! keyword (`title`, `format`, `minItems`, ...) is accepted and ignored.
//!
//! Keywords whose JSON shape falls outside the subset (a `type` list, tuple
//! `items`, non-string `enum` values) still parse; the resolver rejects
//! them with an error naming the definition.
//!
//! Property and definition order is significant: it becomes member order in
//! the generated structs and resolution order for definitions. Both maps are
//! therefore [`IndexMap`]s rather than sorted maps.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A node of a JSON Schema document.
///
/// The document root and every nested schema share this type. Only the root
/// is expected to carry `definitions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Reference to another definition (e.g., `"#/definitions/location"`).
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,

    /// Type keyword (e.g., `"object"`, `"array"`, `"string"`). Kept as raw
    /// JSON since only the string form is supported.
    #[serde(rename = "type", default)]
    pub type_name: Option<serde_json::Value>,

    /// Human-readable description, carried into generated doc comments.
    #[serde(default)]
    pub description: Option<String>,

    /// Element schema for `array` types.
    #[serde(default)]
    pub items: Option<ItemsSchema>,

    /// Object properties in document order.
    #[serde(default)]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    /// Policy for keys not listed in `properties`.
    #[serde(default)]
    pub additional_properties: Option<AdditionalPropertiesSchema>,

    /// Named definitions, in document order.
    #[serde(default)]
    pub definitions: IndexMap<String, SchemaNode>,

    /// Closed set of values; only strings are supported.
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Names of the properties that must be present.
    #[serde(default)]
    pub required: Vec<String>,

    /// Default value for a property, kept as raw JSON until emission.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

/// The two shapes `additionalProperties` may take.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalPropertiesSchema {
    /// `true` admits arbitrary extra keys, `false` forbids them.
    Allowed(bool),
    /// Extra keys must match this schema.
    Schema(Box<SchemaNode>),
}

/// The two shapes `items` may take.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemsSchema {
    /// Every element matches this schema.
    Single(Box<SchemaNode>),
    /// Positional element schemas. Not supported by the resolver.
    Tuple(Vec<SchemaNode>),
}

impl SchemaNode {
    /// The `type` keyword when it is a single string.
    pub fn type_keyword(&self) -> Option<&str> {
        self.type_name.as_ref().and_then(serde_json::Value::as_str)
    }

    /// Whether `name` appears in this node's `required` list.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Parse a schema document from JSON text.
pub fn parse_schema(text: &str) -> Result<SchemaNode> {
    let schema: SchemaNode = serde_json::from_str(text)?;
    Ok(schema)
}

/// Load a schema document from disk.
pub fn load_schema(path: &Path) -> Result<SchemaNode> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_schema(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_schema_json() -> &'static str {
        r##"{
            "$schema": "http://json-schema.org/draft-04/schema#",
            "type": "object",
            "properties": {
                "version": {
                    "description": "The format version.",
                    "enum": ["2.1.0"]
                },
                "runs": {
                    "type": "array",
                    "minItems": 0,
                    "items": { "$ref": "#/definitions/run" }
                }
            },
            "required": ["version", "runs"],
            "definitions": {
                "run": {
                    "type": "object",
                    "properties": {
                        "zeta": { "type": "string" },
                        "alpha": { "type": "integer", "default": -1 }
                    },
                    "additionalProperties": false
                },
                "propertyBag": {
                    "type": "object",
                    "additionalProperties": true
                },
                "tags": {
                    "type": "object",
                    "additionalProperties": { "type": "string" }
                }
            }
        }"##
    }

    #[test]
    fn parse_root_and_definitions() {
        let schema = parse_schema(minimal_schema_json()).unwrap();
        assert_eq!(schema.type_keyword(), Some("object"));
        assert_eq!(schema.definitions.len(), 3);
        assert!(schema.is_required("runs"));
        assert!(!schema.is_required("run"));
    }

    #[test]
    fn property_order_is_preserved() {
        let schema = parse_schema(minimal_schema_json()).unwrap();
        let run = &schema.definitions["run"];
        let keys: Vec<&str> = run
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys, ["zeta", "alpha"]);

        let defs: Vec<&str> = schema.definitions.keys().map(|k| k.as_str()).collect();
        assert_eq!(defs, ["run", "propertyBag", "tags"]);
    }

    #[test]
    fn additional_properties_shapes() {
        let schema = parse_schema(minimal_schema_json()).unwrap();
        assert!(matches!(
            schema.definitions["run"].additional_properties,
            Some(AdditionalPropertiesSchema::Allowed(false))
        ));
        assert!(matches!(
            schema.definitions["propertyBag"].additional_properties,
            Some(AdditionalPropertiesSchema::Allowed(true))
        ));
        match &schema.definitions["tags"].additional_properties {
            Some(AdditionalPropertiesSchema::Schema(inner)) => {
                assert_eq!(inner.type_keyword(), Some("string"));
            }
            other => panic!("expected nested schema, got {other:?}"),
        }
    }

    #[test]
    fn reference_and_default_are_carried() {
        let schema = parse_schema(minimal_schema_json()).unwrap();
        let runs = &schema.properties.as_ref().unwrap()["runs"];
        match &runs.items {
            Some(ItemsSchema::Single(items)) => {
                assert_eq!(items.reference.as_deref(), Some("#/definitions/run"));
            }
            other => panic!("expected single items schema, got {other:?}"),
        }
        let alpha = &schema.definitions["run"].properties.as_ref().unwrap()["alpha"];
        assert_eq!(alpha.default, Some(serde_json::json!(-1)));
    }

    #[test]
    fn unsupported_shapes_still_parse() {
        let schema = parse_schema(
            r#"{"definitions": {
                "when": {"type": ["string", "null"]},
                "pair": {"type": "array", "items": [{"type": "string"}, {"type": "integer"}]},
                "code": {"enum": [1, 2]}
            }}"#,
        )
        .unwrap();
        assert_eq!(schema.definitions["when"].type_keyword(), None);
        assert!(schema.definitions["when"].type_name.is_some());
        assert!(matches!(
            schema.definitions["pair"].items,
            Some(ItemsSchema::Tuple(ref parts)) if parts.len() == 2
        ));
        assert_eq!(
            schema.definitions["code"].enum_values,
            Some(vec![serde_json::json!(1), serde_json::json!(2)])
        );
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_schema("{ \"type\": ").unwrap_err();
        assert!(err.to_string().contains("failed to parse JSON"));
    }
}
