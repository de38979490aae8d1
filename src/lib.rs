//! Generate C++ data types and serializers from a JSON Schema document.
//!
//! `schema-cpp-gen` turns a JSON Schema (the subset built from `$ref`,
//! `type`, `items`, `properties`, `additionalProperties`, `enum`,
//! `required`, `default` and `description`) into a C++ header of structs
//! and enums plus a source file of `nlohmann::json` `to_json`/`from_json`
//! functions. It is meant to run at build time so generated types never
//! drift from the schema.
//!
//! The pipeline runs in two pure stages:
//!
//! 1. [`resolve::resolve`] walks the definition graph into an ordered
//!    [`ir::Resolution`], breaking reference cycles with forward
//!    declarations and resolving every definition exactly once.
//! 2. [`codegen::emit`] renders the header and source text from it.
//!
//! # Features
//!
//! - Self- and mutually-recursive definitions
//! - Required, defaulted and optional members, with defaults omitted on encode
//! - `additionalProperties` as typed maps or free-form `json`
//! - Unknown keys are ignored on decode, so older code reads newer data
//! - Deterministic output: byte-identical across runs
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use schema_cpp_gen::codegen::{self, EmitOptions};
//!
//! let schema = schema_cpp_gen::schema::load_schema(Path::new("sarif-schema-2.1.0.json"))?;
//! let artifacts = codegen::generate(&schema, &EmitOptions::default())?;
//! codegen::write_artifacts(&artifacts, Path::new("sarif.hpp"), Path::new("sarif.cpp"))?;
//! eprintln!("Generated {} structs", artifacts.stats.structs_generated);
//! # Ok::<(), schema_cpp_gen::error::Error>(())
//! ```

pub mod codegen;
pub mod defaults;
pub mod error;
pub mod ir;
pub mod naming;
pub mod resolve;
pub mod schema;
pub mod type_map;
