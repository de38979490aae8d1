//! Identifier policy for generated C++ names.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `resultProvenance` | [`to_snake_case`] | `result_provenance` |
//! | `notApplicable` | [`to_pascal_case`] | `NotApplicable` |
//! | `2.1.0` | [`sanitize`] | `2_1_0` |
//! | `notApplicable` | [`enum_member_name`] | `kNotApplicable` |
//!
//! None of these are injective: two schema names may map to the same
//! identifier. Such collisions are not detected.

/// Prefix for enum member identifiers, keeping them clear of C++ keywords.
pub const ENUM_MEMBER_PREFIX: char = 'k';

/// Convert a camelCase definition name to snake_case.
///
/// Every ASCII uppercase letter becomes `_` followed by its lowercase form,
/// so a leading capital produces a leading underscore:
/// - `"resultProvenance"` → `"result_provenance"`
/// - `"Level"` → `"_level"`
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Uppercase the first character, leaving the rest unchanged.
pub fn to_pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Replace `-`, `.` and space with `_`.
pub fn sanitize(name: &str) -> String {
    name.replace(['-', '.', ' '], "_")
}

/// Identifier of the enum member generated for a schema enum value.
///
/// - `"warning"` → `"kWarning"`
/// - `"2.1.0"` → `"k2_1_0"`
pub fn enum_member_name(value: &str) -> String {
    format!("{ENUM_MEMBER_PREFIX}{}", sanitize(&to_pascal_case(value)))
}
