//! Maps IR types to C++ type spellings.
//!
//! # Type Mapping Table
//!
//! | IR type | C++ type | Notes |
//! |---------|----------|-------|
//! | `boolean` | `bool` | |
//! | `number` | `double` | |
//! | `integer` | `int64_t` | |
//! | `string` | `std::string` | |
//! | free-form object | `json` | alias of `nlohmann::json` in the generated namespace |
//! | `Array(T)` | `std::vector< T >` | |
//! | `Map(T)` | `std::unordered_map< std::string, T >` | |
//! | struct, enum, forward reference | snake_cased definition name | qualified on collision |

use crate::ir::{FieldType, Primitive};
use crate::naming::to_snake_case;

/// C++ spelling of a primitive.
pub fn primitive_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Boolean => "bool",
        Primitive::Number => "double",
        Primitive::Integer => "int64_t",
        Primitive::String => "std::string",
        Primitive::Json => "json",
    }
}

/// Fully qualify `name` within `namespace` (e.g., `::gap::sarif::location`).
pub fn qualify(namespace: &str, name: &str) -> String {
    format!("::{namespace}::{name}")
}

/// C++ type for `ty` as spelled inside a struct whose members are named
/// `field_names`.
///
/// A member named like its own type would shadow the type within the
/// struct body, so colliding names are qualified with `namespace`. This
/// applies at every nesting level.
pub fn type_name(ty: &FieldType, namespace: &str, field_names: &[&str]) -> String {
    let name = match ty {
        FieldType::Struct(s) => to_snake_case(&s.name),
        FieldType::Enum(e) => to_snake_case(&e.name),
        FieldType::ForwardRef(name) => to_snake_case(name),
        FieldType::Array(inner) => {
            format!("std::vector< {} >", type_name(inner, namespace, field_names))
        }
        FieldType::Map(inner) => format!(
            "std::unordered_map< std::string, {} >",
            type_name(inner, namespace, field_names)
        ),
        FieldType::Primitive(primitive) => primitive_type(*primitive).to_string(),
    };
    if field_names.contains(&name.as_str()) {
        qualify(namespace, &name)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ir::{Enum, Struct};

    const NS: &str = "gap::sarif";

    fn location() -> FieldType {
        FieldType::Struct(Rc::new(Struct {
            name: "physicalLocation".to_string(),
            fields: Vec::new(),
            description: None,
            additional_props: None,
        }))
    }

    #[test]
    fn primitive_type_mapping() {
        assert_eq!(primitive_type(Primitive::Boolean), "bool");
        assert_eq!(primitive_type(Primitive::Number), "double");
        assert_eq!(primitive_type(Primitive::Integer), "int64_t");
        assert_eq!(primitive_type(Primitive::String), "std::string");
        assert_eq!(primitive_type(Primitive::Json), "json");
    }

    #[test]
    fn definition_types_are_snake_cased() {
        assert_eq!(type_name(&location(), NS, &[]), "physical_location");
        let level = FieldType::Enum(Rc::new(Enum {
            name: "level".to_string(),
            values: vec!["note".to_string()],
        }));
        assert_eq!(type_name(&level, NS, &[]), "level");
        let fwd = FieldType::ForwardRef("resultProvenance".to_string());
        assert_eq!(type_name(&fwd, NS, &[]), "result_provenance");
    }

    #[test]
    fn containers_nest() {
        let ty = FieldType::Map(Box::new(FieldType::Array(Box::new(FieldType::Primitive(
            Primitive::String,
        )))));
        assert_eq!(
            type_name(&ty, NS, &[]),
            "std::unordered_map< std::string, std::vector< std::string > >"
        );
    }

    #[test]
    fn collision_with_field_name_is_qualified() {
        let ty = FieldType::Array(Box::new(location()));
        assert_eq!(
            type_name(&ty, NS, &["physical_location"]),
            "std::vector< ::gap::sarif::physical_location >"
        );
        assert_eq!(type_name(&location(), NS, &["uri"]), "physical_location");
    }
}
