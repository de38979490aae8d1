//! Resolution of a schema document into the IR.
//!
//! Resolution is a memoized depth-first walk over the definition graph:
//!
//! 1. The document root is built as a struct named [`ROOT_NAME`].
//! 2. Every entry of `definitions` is resolved by name, in document order,
//!    so definitions nothing refers to still produce a node.
//! 3. A reference to a definition that is still being resolved (a cycle)
//!    yields a forward declaration, appended to the output at the point the
//!    cycle is detected and thus ahead of the struct that needs it.
//!
//! Nodes are appended to the output once all the nodes they depend on have
//! been appended, which keeps the sequence in declaration order for the
//! code emitter.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::ir::{
    AdditionalProperties, Enum, Field, FieldType, IrNode, Primitive, Resolution, Struct,
};
use crate::schema::{AdditionalPropertiesSchema, ItemsSchema, SchemaNode};

/// Name of the implicit struct built from the document root.
pub const ROOT_NAME: &str = "root";

/// Only references into the document's own `definitions` are supported.
const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Name under which a typed `additionalProperties` schema is resolved.
const ADDITIONAL_PROPERTIES_NAME: &str = "additional_properties";

/// Meta-key excluded from struct fields.
const SCHEMA_KEY: &str = "$schema";

/// Resolve a schema document into an ordered IR sequence.
///
/// Fails on the first definition outside the supported subset; no partial
/// output is returned.
pub fn resolve(schema: &SchemaNode) -> Result<Resolution> {
    let mut resolver = Resolver::new(&schema.definitions);

    resolver.make_struct(ROOT_NAME, schema)?;
    for name in schema.definitions.keys() {
        resolver.get_ref(name)?;
    }

    let resolution = Resolution::new(resolver.output);
    info!(
        nodes = resolution.nodes().len(),
        structs = resolution.structs().count(),
        enums = resolution.enums().count(),
        forward_refs = resolution.forward_refs().count(),
        "schema resolved"
    );
    Ok(resolution)
}

// ── Definition registry ────────────────────────────────────────────────

#[derive(Debug)]
enum Visit {
    InProgress,
    Done(FieldType),
}

/// Memo table for one resolution pass.
#[derive(Debug, Default)]
struct Registry {
    /// Latest node registered under each name. Holds forward references
    /// while a definition is in progress, and inline structs and enums
    /// named after their property.
    resolved: HashMap<String, FieldType>,
    /// Visitation state of `definitions` entries.
    visits: HashMap<String, Visit>,
}

// ── Resolver ───────────────────────────────────────────────────────────

struct Resolver<'a> {
    definitions: &'a IndexMap<String, SchemaNode>,
    registry: Registry,
    output: Vec<IrNode>,
}

impl<'a> Resolver<'a> {
    fn new(definitions: &'a IndexMap<String, SchemaNode>) -> Self {
        Self {
            definitions,
            registry: Registry::default(),
            output: Vec::new(),
        }
    }

    /// Resolve a definition by name, memoized and cycle-aware.
    fn get_ref(&mut self, name: &str) -> Result<FieldType> {
        match self.registry.visits.get(name) {
            Some(Visit::Done(ty)) => return Ok(ty.clone()),
            Some(Visit::InProgress) => return Ok(self.forward_ref(name)),
            None => {}
        }

        let definitions = self.definitions;
        let Some(node) = definitions.get(name) else {
            return Err(Error::MalformedRef {
                name: name.to_string(),
                reference: format!("{DEFINITIONS_PREFIX}{name}"),
            });
        };

        debug!(definition = name, "resolving definition");
        self.registry
            .visits
            .insert(name.to_string(), Visit::InProgress);
        let ty = self.get_field(name, node)?;
        self.registry.resolved.insert(name.to_string(), ty.clone());
        self.registry
            .visits
            .insert(name.to_string(), Visit::Done(ty.clone()));
        Ok(ty)
    }

    /// Break a cycle on `name`, reusing an existing placeholder if one has
    /// already been emitted.
    fn forward_ref(&mut self, name: &str) -> FieldType {
        if let Some(existing) = self.registry.resolved.get(name) {
            return existing.clone();
        }
        debug!(definition = name, "reference cycle, emitting forward declaration");
        let placeholder = FieldType::ForwardRef(name.to_string());
        self.output.push(IrNode::ForwardRef(name.to_string()));
        self.registry
            .resolved
            .insert(name.to_string(), placeholder.clone());
        placeholder
    }

    /// Resolve a schema node appearing under `name`.
    fn get_field(&mut self, name: &str, node: &'a SchemaNode) -> Result<FieldType> {
        if let Some(reference) = &node.reference {
            let target = self.reference_target(name, reference)?;
            return self.get_ref(target);
        }

        if let Some(type_value) = &node.type_name {
            // Only a single type name is supported, not a list of them.
            let Some(type_name) = type_value.as_str() else {
                return Err(Error::UnsupportedType {
                    name: name.to_string(),
                    type_name: type_value.to_string(),
                });
            };
            if let Some(primitive) = Primitive::from_type_name(type_name) {
                return Ok(FieldType::Primitive(primitive));
            }
            return match type_name {
                "array" => self.get_array(name, node),
                "object" => self.get_object(name, node),
                other => Err(Error::UnsupportedType {
                    name: name.to_string(),
                    type_name: other.to_string(),
                }),
            };
        }

        if let Some(values) = &node.enum_values {
            let values = enum_strings(name, values)?;
            return Ok(FieldType::Enum(self.make_enum(name, values)));
        }

        Err(Error::UnrecognizedField {
            name: name.to_string(),
        })
    }

    fn get_array(&mut self, name: &str, node: &'a SchemaNode) -> Result<FieldType> {
        match &node.items {
            Some(ItemsSchema::Single(items)) => {
                Ok(FieldType::Array(Box::new(self.get_field(name, items)?)))
            }
            Some(ItemsSchema::Tuple(_)) => Err(Error::UnsupportedType {
                name: name.to_string(),
                type_name: "array with positional `items`".to_string(),
            }),
            None => Err(Error::MissingItems {
                name: name.to_string(),
            }),
        }
    }

    /// An `object` is a map or free-form blob when it only constrains
    /// extra keys, and a struct otherwise.
    fn get_object(&mut self, name: &str, node: &'a SchemaNode) -> Result<FieldType> {
        if node.properties.is_none() {
            match &node.additional_properties {
                Some(AdditionalPropertiesSchema::Allowed(true)) => {
                    return Ok(FieldType::Primitive(Primitive::Json));
                }
                Some(AdditionalPropertiesSchema::Schema(inner)) => {
                    return Ok(FieldType::Map(Box::new(self.get_field(name, inner)?)));
                }
                Some(AdditionalPropertiesSchema::Allowed(false)) | None => {}
            }
        }
        Ok(FieldType::Struct(self.make_struct(name, node)?))
    }

    fn make_struct(&mut self, name: &str, node: &'a SchemaNode) -> Result<Rc<Struct>> {
        let additional_props = match &node.additional_properties {
            None | Some(AdditionalPropertiesSchema::Allowed(false)) => None,
            Some(AdditionalPropertiesSchema::Allowed(true)) => Some(AdditionalProperties::FreeForm),
            Some(AdditionalPropertiesSchema::Schema(inner)) => {
                match self.get_field(ADDITIONAL_PROPERTIES_NAME, inner)? {
                    FieldType::Primitive(Primitive::Json) => Some(AdditionalProperties::FreeForm),
                    ty => Some(AdditionalProperties::Typed(ty)),
                }
            }
        };

        let mut fields = Vec::new();
        for (field_name, field_schema) in node.properties.iter().flatten() {
            if field_name == SCHEMA_KEY {
                continue;
            }
            let ty = self.get_field(field_name, field_schema)?;
            fields.push(Field {
                name: field_name.clone(),
                ty,
                description: field_schema.description.clone(),
                required: node.is_required(field_name),
                default: field_schema.default.clone(),
            });
        }

        let resolved = Rc::new(Struct {
            name: name.to_string(),
            fields,
            description: node.description.clone(),
            additional_props,
        });
        self.output.push(IrNode::Struct(Rc::clone(&resolved)));
        self.registry
            .resolved
            .insert(name.to_string(), FieldType::Struct(Rc::clone(&resolved)));
        Ok(resolved)
    }

    /// A second enum under the same name is the node built the first time.
    fn make_enum(&mut self, name: &str, values: Vec<String>) -> Rc<Enum> {
        if let Some(FieldType::Enum(existing)) = self.registry.resolved.get(name) {
            debug!(definition = name, "reusing enum");
            return Rc::clone(existing);
        }
        let resolved = Rc::new(Enum {
            name: name.to_string(),
            values,
        });
        self.output.push(IrNode::Enum(Rc::clone(&resolved)));
        self.registry
            .resolved
            .insert(name.to_string(), FieldType::Enum(Rc::clone(&resolved)));
        resolved
    }

    /// Extract the definition name from a local `$ref`.
    fn reference_target<'r>(&self, name: &str, reference: &'r str) -> Result<&'r str> {
        reference
            .strip_prefix(DEFINITIONS_PREFIX)
            .filter(|target| self.definitions.contains_key(*target))
            .ok_or_else(|| Error::MalformedRef {
                name: name.to_string(),
                reference: reference.to_string(),
            })
    }
}

/// Enum values as strings; any other JSON value is rejected.
fn enum_strings(name: &str, values: &[serde_json::Value]) -> Result<Vec<String>> {
    values
        .iter()
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::UnsupportedEnumValue {
                    name: name.to_string(),
                    value: value.to_string(),
                })
        })
        .collect()
}
