//! C++ code generation from the resolved IR.
//!
//! Produces two artifacts from a [`Resolution`]:
//! - a header with one declaration per node: forward declarations, structs
//!   with doc comments and `to_json`/`from_json` prototypes, and
//!   `enum class` types with their `NLOHMANN_JSON_SERIALIZE_ENUM` tables
//! - a source file with the `std::optional` adapter and one decoder
//!   (`from_json`) and encoder (`to_json`) per struct
//!
//! Output is deterministic: identical input produces byte-identical text.

use std::fmt::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::defaults::{is_empty_sequence, quote, render_default};
use crate::error::{Error, Result};
use crate::ir::{AdditionalProperties, Enum, FieldState, IrNode, Primitive, Resolution, Struct};
use crate::naming::{enum_member_name, to_snake_case};
use crate::schema::SchemaNode;
use crate::type_map::{primitive_type, type_name};

/// Member name of the catch-all for undeclared keys.
const ADDITIONAL_PROPERTIES_MEMBER: &str = "additional_properties";

/// Settings for the generated C++.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Namespace enclosing every generated declaration (e.g., `gap::sarif`).
    pub namespace: String,
    /// Path of the generated header as included by the source artifact.
    pub header_include: String,
    /// Where the schema came from, recorded in the header banner.
    pub source_url: Option<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            namespace: "gap::sarif".to_string(),
            header_include: "gap/sarif/sarif.hpp".to_string(),
            source_url: None,
        }
    }
}

/// Statistics collected during generation for reporting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    pub structs_generated: usize,
    pub enums_generated: usize,
    pub forward_declarations: usize,
    pub fields_generated: usize,
}

/// The two generated text artifacts.
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Type declarations.
    pub header: String,
    /// Serialization functions.
    pub source: String,
    pub stats: GenerationStats,
}

/// Resolve `schema` and emit C++ for it.
pub fn generate(schema: &SchemaNode, options: &EmitOptions) -> Result<Artifacts> {
    let resolution = crate::resolve::resolve(schema)?;
    emit(&resolution, options)
}

/// Emit the header and source artifacts for a resolved sequence.
///
/// Fails if a forward declaration is never followed by its definition,
/// since the generated header could not compile.
pub fn emit(resolution: &Resolution, options: &EmitOptions) -> Result<Artifacts> {
    check_forward_refs(resolution)?;

    let mut stats = GenerationStats::default();
    let header = render_header(resolution, options, &mut stats)
        .map_err(|e| Error::Codegen(format!("rendering header: {e}")))?;
    let source = render_source(resolution, options)
        .map_err(|e| Error::Codegen(format!("rendering source: {e}")))?;

    info!(
        structs = stats.structs_generated,
        enums = stats.enums_generated,
        forward_declarations = stats.forward_declarations,
        "generated C++"
    );
    Ok(Artifacts {
        header,
        source,
        stats,
    })
}

/// Write both artifacts, creating parent directories as needed.
pub fn write_artifacts(artifacts: &Artifacts, header_path: &Path, source_path: &Path) -> Result<()> {
    write_file(header_path, &artifacts.header)?;
    write_file(source_path, &artifacts.source)?;
    Ok(())
}

fn check_forward_refs(resolution: &Resolution) -> Result<()> {
    for (index, node) in resolution.nodes().iter().enumerate() {
        let IrNode::ForwardRef(name) = node else {
            continue;
        };
        let defined_later = resolution.nodes()[index + 1..]
            .iter()
            .any(|n| matches!(n, IrNode::Struct(s) if s.name == *name));
        if !defined_later {
            return Err(Error::Codegen(format!(
                "forward declaration of '{name}' has no definition"
            )));
        }
    }
    Ok(())
}

// ── Declaration artifact ───────────────────────────────────────────────

fn render_header(
    resolution: &Resolution,
    options: &EmitOptions,
    stats: &mut GenerationStats,
) -> std::result::Result<String, fmt::Error> {
    let mut out = String::new();
    let namespace = &options.namespace;

    writeln!(out, "// Generated by schema-cpp-gen. Do not edit.")?;
    writeln!(out)?;
    writeln!(out, "#pragma once")?;
    writeln!(out)?;
    writeln!(out, "//")?;
    if let Some(url) = &options.source_url {
        writeln!(out, "// These definitions were generated from a JSON Schema found at")?;
        writeln!(out, "// {url}")?;
        writeln!(out, "//")?;
    }
    writeln!(
        out,
        "// Definition names are converted from camelCase to snake_case,"
    )?;
    writeln!(out, "// property names are kept as-is.")?;
    writeln!(out, "//")?;
    writeln!(
        out,
        "// Enum value names are converted to PascalCase and prefixed with `k`."
    )?;
    writeln!(out, "//")?;
    writeln!(out)?;
    for header in ["cstdint", "optional", "string", "unordered_map", "vector"] {
        writeln!(out, "#include <{header}>")?;
    }
    writeln!(out)?;
    writeln!(out, "#include <nlohmann/json.hpp>")?;
    writeln!(out)?;
    writeln!(out, "namespace {namespace}")?;
    writeln!(out, "{{")?;
    writeln!(out, "    using json = nlohmann::json;")?;

    for node in resolution.nodes() {
        match node {
            IrNode::ForwardRef(name) => {
                writeln!(out, "    struct {};", to_snake_case(name))?;
                stats.forward_declarations += 1;
            }
            IrNode::Struct(s) => {
                debug!(name = %s.name, fields = s.fields.len(), "emitting struct");
                write_struct(&mut out, s, namespace)?;
                stats.structs_generated += 1;
                stats.fields_generated += s.fields.len();
            }
            IrNode::Enum(e) => {
                debug!(name = %e.name, values = e.values.len(), "emitting enum");
                write_enum(&mut out, e)?;
                stats.enums_generated += 1;
            }
        }
    }

    writeln!(out, "}} // namespace {namespace}")?;
    Ok(out)
}

fn write_comment(out: &mut String, indent: &str, text: &str) -> fmt::Result {
    writeln!(out, "{indent}//")?;
    for line in text.lines() {
        writeln!(out, "{indent}// {line}")?;
    }
    writeln!(out, "{indent}//")
}

fn write_struct(out: &mut String, s: &Struct, namespace: &str) -> fmt::Result {
    let struct_name = to_snake_case(&s.name);
    // Member names that shadow same-named types inside the struct body.
    let mut field_names: Vec<&str> = s.fields.iter().map(|f| f.name.as_str()).collect();
    if s.additional_props.is_some() {
        field_names.push(ADDITIONAL_PROPERTIES_MEMBER);
    }

    writeln!(out)?;
    if let Some(description) = &s.description {
        write_comment(out, "    ", description)?;
    }
    writeln!(out, "    struct {struct_name} {{")?;

    for (index, field) in s.fields.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        if let Some(description) = &field.description {
            write_comment(out, "        ", description)?;
        }
        let ty = type_name(&field.ty, namespace, &field_names);
        let name = &field.name;
        match field.state() {
            FieldState::Required => writeln!(out, "        {ty} {name};")?,
            FieldState::Defaulted => {
                let default = render_default(field, namespace).unwrap_or_default();
                writeln!(out, "        {ty} {name} = {default};")?;
            }
            FieldState::Optional if field.ty.is_array() => {
                writeln!(out, "        {ty} {name} = {{}};")?;
            }
            FieldState::Optional => {
                writeln!(out, "        std::optional< {ty} > {name} = std::nullopt;")?;
            }
        }
    }

    if let Some(additional) = &s.additional_props {
        if !s.fields.is_empty() {
            writeln!(out)?;
        }
        let ty = match additional {
            AdditionalProperties::FreeForm => primitive_type(Primitive::Json).to_string(),
            AdditionalProperties::Typed(value) => format!(
                "std::unordered_map< std::string, {} >",
                type_name(value, namespace, &field_names)
            ),
        };
        writeln!(out, "        {ty} {ADDITIONAL_PROPERTIES_MEMBER};")?;
    }

    writeln!(out, "    }};")?;
    writeln!(out)?;
    writeln!(out, "    void to_json(json &, const {struct_name} &);")?;
    writeln!(out, "    void from_json(const json &, {struct_name} &);")
}

/// Values are listed in schema order; on duplicate values the first
/// mapping entry wins when nlohmann looks them up.
fn write_enum(out: &mut String, e: &Enum) -> fmt::Result {
    let enum_name = to_snake_case(&e.name);

    writeln!(out)?;
    writeln!(out, "    enum class {enum_name} {{")?;
    for value in &e.values {
        writeln!(out, "        {},", enum_member_name(value))?;
    }
    writeln!(out, "    }};")?;
    writeln!(out)?;
    writeln!(out, "    NLOHMANN_JSON_SERIALIZE_ENUM({enum_name}, {{")?;
    for value in &e.values {
        writeln!(
            out,
            "        {{ {enum_name}::{}, {} }},",
            enum_member_name(value),
            quote(value)
        )?;
    }
    writeln!(out, "    }})")
}

// ── Serialization artifact ─────────────────────────────────────────────

/// Lets `std::optional` members round-trip through `get_to` and
/// assignment: `null` decodes to `std::nullopt`, and encoders only assign
/// present values.
const OPTIONAL_ADAPTER: &str = r#"namespace nlohmann {
    template<typename T>
    struct adl_serializer< std::optional<T> > {
        static void from_json(const json& j, std::optional<T>& opt) {
            if ( j.is_null() ) {
                opt = std::nullopt;
            } else {
                opt = std::optional<T>{ j.get<T>() };
            }
        }

        static void to_json(json& j, const std::optional<T>& opt) {
            if ( opt.has_value() ) {
                j = *opt;
            } else {
                j = nullptr;
            }
        }
    };
}"#;

fn render_source(
    resolution: &Resolution,
    options: &EmitOptions,
) -> std::result::Result<String, fmt::Error> {
    let mut out = String::new();
    let namespace = &options.namespace;

    writeln!(out, "// Generated by schema-cpp-gen. Do not edit.")?;
    writeln!(out)?;
    writeln!(out, "#include <{}>", options.header_include)?;
    writeln!(out)?;
    writeln!(out, "{OPTIONAL_ADAPTER}")?;
    writeln!(out)?;
    writeln!(out, "namespace {namespace} {{")?;

    for s in resolution.structs() {
        write_from_json(&mut out, s)?;
        write_to_json(&mut out, s, namespace)?;
    }

    writeln!(out, "}} // namespace {namespace}")?;
    Ok(out)
}

/// Decoder: first matching field name wins; unknown keys go to the
/// catch-all member when there is one and are dropped otherwise.
fn write_from_json(out: &mut String, s: &Struct) -> fmt::Result {
    let struct_name = to_snake_case(&s.name);

    if s.fields.is_empty() && s.additional_props.is_none() {
        writeln!(out, "    void from_json(const json &, {struct_name} &) {{}}")?;
        return Ok(());
    }

    writeln!(out, "    void from_json(const json &j, {struct_name} &o) {{")?;
    writeln!(out, "        for( const auto &[key, val] : j.items() ) {{")?;

    let catch_all = format!("val.get_to(o.{ADDITIONAL_PROPERTIES_MEMBER}[key]);");
    if s.fields.is_empty() {
        writeln!(out, "            {catch_all}")?;
    } else {
        write!(out, "            ")?;
        for (index, field) in s.fields.iter().enumerate() {
            if index > 0 {
                write!(out, " else ")?;
            }
            writeln!(out, "if ( key == {} ) {{", quote(&field.name))?;
            writeln!(out, "                val.get_to(o.{});", field.name)?;
            write!(out, "            }}")?;
        }
        if s.additional_props.is_some() {
            writeln!(out, " else {{")?;
            writeln!(out, "                {catch_all}")?;
            write!(out, "            }}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "        }}")?;
    writeln!(out, "    }}")
}

/// Encoder: required keys always, defaulted keys when they differ from the
/// default, optional keys when present or non-empty, then extra keys.
fn write_to_json(out: &mut String, s: &Struct, namespace: &str) -> fmt::Result {
    let struct_name = to_snake_case(&s.name);

    if s.fields.is_empty() && s.additional_props.is_none() {
        writeln!(out, "    void to_json(json &j, const {struct_name} &) {{")?;
        writeln!(out, "        j = json::object();")?;
        writeln!(out, "    }}")?;
        return Ok(());
    }

    writeln!(out, "    void to_json(json &j, const {struct_name} &o) {{")?;
    writeln!(out, "        j = json::object();")?;

    for field in &s.fields {
        let name = &field.name;
        let key = quote(name);
        let condition = match field.state() {
            FieldState::Required => {
                writeln!(out, "        j[{key}] = o.{name};")?;
                continue;
            }
            FieldState::Defaulted if is_empty_sequence(field) => format!("!o.{name}.empty()"),
            FieldState::Defaulted => {
                let default = render_default(field, namespace).unwrap_or_default();
                if field.default.as_ref().is_some_and(serde_json::Value::is_array) {
                    format!("o.{name} != decltype(o.{name}){default}")
                } else {
                    format!("o.{name} != {default}")
                }
            }
            FieldState::Optional if field.ty.is_array() => format!("!o.{name}.empty()"),
            FieldState::Optional => {
                writeln!(out, "        if ( o.{name}.has_value() ) {{")?;
                writeln!(out, "            j[{key}] = *o.{name};")?;
                writeln!(out, "        }}")?;
                continue;
            }
        };
        writeln!(out, "        if ( {condition} ) {{")?;
        writeln!(out, "            j[{key}] = o.{name};")?;
        writeln!(out, "        }}")?;
    }

    match &s.additional_props {
        Some(AdditionalProperties::FreeForm) => {
            writeln!(
                out,
                "        for ( auto &[key, val] : o.{ADDITIONAL_PROPERTIES_MEMBER}.items() ) {{"
            )?;
            writeln!(out, "            j[key] = val;")?;
            writeln!(out, "        }}")?;
        }
        Some(AdditionalProperties::Typed(_)) => {
            writeln!(
                out,
                "        for ( auto &[key, val] : o.{ADDITIONAL_PROPERTIES_MEMBER} ) {{"
            )?;
            writeln!(out, "            j[key] = val;")?;
            writeln!(out, "        }}")?;
        }
        None => {}
    }

    writeln!(out, "    }}")
}

/// Write content to a file, creating parent directories as needed.
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
