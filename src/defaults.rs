//! Rendering of schema default values as C++ expressions.
//!
//! Defaults are rendered per field rather than per type: one enum or array
//! type may back several fields with different defaults.
//!
//! | Element type | Default | C++ |
//! |--------------|---------|-----|
//! | `string` | `"a \"b\""` | `"a \"b\""` |
//! | enum `level` | `"warning"` | `::gap::sarif::level::kWarning` |
//! | `boolean` | `true` | `true` |
//! | `integer` | `-1` | `-1` |
//! | free-form | `{"a": 1}` | `json::parse(R"json({"a":1})json")` |
//! | array | `[]` | `{}` |
//! | array | `["a", "b"]` | `{ "a", "b" }` |

use serde_json::Value;

use crate::ir::{Field, FieldType, Primitive};
use crate::naming::{enum_member_name, to_snake_case};
use crate::type_map::qualify;

/// Render `field`'s default as a C++ expression.
///
/// Returns `None` when the field has no default. Names inside `namespace`
/// are always fully qualified.
pub fn render_default(field: &Field, namespace: &str) -> Option<String> {
    let default = field.default.as_ref()?;
    let element = field.ty.element();
    let rendered = match default {
        Value::Array(items) if items.is_empty() => "{}".to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| render_literal(element, item, namespace))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
        scalar => render_literal(element, scalar, namespace),
    };
    Some(rendered)
}

/// Whether the default is an empty sequence, encoded as an emptiness test.
pub fn is_empty_sequence(field: &Field) -> bool {
    matches!(&field.default, Some(Value::Array(items)) if items.is_empty())
}

fn render_literal(ty: &FieldType, value: &Value, namespace: &str) -> String {
    match (ty, value) {
        (FieldType::Primitive(Primitive::String), _) => quote(&text_of(value)),
        (FieldType::Enum(e), _) => format!(
            "{}::{}",
            qualify(namespace, &to_snake_case(&e.name)),
            enum_member_name(&text_of(value))
        ),
        (_, Value::Bool(b)) => b.to_string(),
        (FieldType::Primitive(Primitive::Json), _) => {
            format!("json::parse(R\"json({value})json\")")
        }
        (_, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

/// String content of a JSON value, without JSON quoting for strings.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Quote `text` as a C++ string literal.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::ir::Enum;

    const NS: &str = "gap::sarif";

    fn field(ty: FieldType, default: Value) -> Field {
        Field {
            name: "f".to_string(),
            ty,
            description: None,
            required: false,
            default: Some(default),
        }
    }

    fn string() -> FieldType {
        FieldType::Primitive(Primitive::String)
    }

    fn level() -> FieldType {
        FieldType::Enum(Rc::new(Enum {
            name: "resultKind".to_string(),
            values: vec!["pass".to_string(), "notApplicable".to_string()],
        }))
    }

    #[test]
    fn no_default_renders_nothing() {
        let f = Field {
            name: "f".to_string(),
            ty: string(),
            description: None,
            required: false,
            default: None,
        };
        assert_eq!(render_default(&f, NS), None);
    }

    #[test]
    fn strings_are_escaped_and_quoted() {
        let f = field(string(), json!("say \"hi\"\r\n\\path"));
        assert_eq!(
            render_default(&f, NS).unwrap(),
            r#""say \"hi\"\r\n\\path""#
        );
    }

    #[test]
    fn enum_defaults_are_qualified_constants() {
        let f = field(level(), json!("notApplicable"));
        assert_eq!(
            render_default(&f, NS).unwrap(),
            "::gap::sarif::result_kind::kNotApplicable"
        );
    }

    #[test]
    fn booleans_and_numbers() {
        let b = field(FieldType::Primitive(Primitive::Boolean), json!(false));
        assert_eq!(render_default(&b, NS).unwrap(), "false");
        let i = field(FieldType::Primitive(Primitive::Integer), json!(-1));
        assert_eq!(render_default(&i, NS).unwrap(), "-1");
        let n = field(FieldType::Primitive(Primitive::Number), json!(0.5));
        assert_eq!(render_default(&n, NS).unwrap(), "0.5");
    }

    #[test]
    fn sequences() {
        let empty = field(FieldType::Array(Box::new(string())), json!([]));
        assert_eq!(render_default(&empty, NS).unwrap(), "{}");
        assert!(is_empty_sequence(&empty));

        let strings = field(FieldType::Array(Box::new(string())), json!(["a", "b"]));
        assert_eq!(render_default(&strings, NS).unwrap(), r#"{ "a", "b" }"#);
        assert!(!is_empty_sequence(&strings));

        let kinds = field(FieldType::Array(Box::new(level())), json!(["pass"]));
        assert_eq!(
            render_default(&kinds, NS).unwrap(),
            "{ ::gap::sarif::result_kind::kPass }"
        );

        let ints = field(
            FieldType::Array(Box::new(FieldType::Primitive(Primitive::Integer))),
            json!([1, 2, 3]),
        );
        assert_eq!(render_default(&ints, NS).unwrap(), "{ 1, 2, 3 }");
    }

    #[test]
    fn free_form_defaults_parse_at_runtime() {
        let f = field(FieldType::Primitive(Primitive::Json), json!({"a": 1}));
        assert_eq!(
            render_default(&f, NS).unwrap(),
            r#"json::parse(R"json({"a":1})json")"#
        );
    }
}
