//! Intermediate representation produced by the resolver.
//!
//! The IR is independent of output syntax. Struct and enum nodes are shared
//! through [`Rc`]: a field whose type is a definition holds a handle to the
//! same node that appears in the [`Resolution`] sequence, so pointer
//! identity, not structural equality, decides "same definition".

use std::rc::Rc;

/// Scalar types of the supported schema subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Boolean,
    Number,
    Integer,
    String,
    /// Opaque structured data (a free-form object).
    Json,
}

impl Primitive {
    /// Map a schema `type` keyword to a primitive.
    ///
    /// Returns `None` for `array`, `object` and anything unrecognized;
    /// `Json` is never produced here since it has no keyword of its own.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            _ => None,
        }
    }
}

/// The resolved type of a field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Primitive(Primitive),
    Array(Box<FieldType>),
    /// String-keyed map with homogeneous values.
    Map(Box<FieldType>),
    Struct(Rc<Struct>),
    Enum(Rc<Enum>),
    /// Placeholder for a definition still being resolved when it was
    /// referenced. Carries only the definition name.
    ForwardRef(String),
}

impl FieldType {
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// The element type for arrays, the type itself otherwise.
    pub fn element(&self) -> &FieldType {
        match self {
            Self::Array(inner) => inner,
            other => other,
        }
    }

    /// Definition name for struct, enum and forward reference types.
    pub fn definition_name(&self) -> Option<&str> {
        match self {
            Self::Struct(s) => Some(&s.name),
            Self::Enum(e) => Some(&e.name),
            Self::ForwardRef(name) => Some(name),
            Self::Primitive(_) | Self::Array(_) | Self::Map(_) => None,
        }
    }
}

/// Which of the three mutually exclusive states a field is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Always present; no initializer.
    Required,
    /// Has a schema default; written only when it differs.
    Defaulted,
    /// Neither required nor defaulted; may be absent.
    Optional,
}

/// A member of a [`Struct`].
#[derive(Debug, Clone)]
pub struct Field {
    /// Schema property key, used verbatim as the member name.
    pub name: String,
    pub ty: FieldType,
    pub description: Option<String>,
    pub required: bool,
    /// Raw schema default, rendered at emission time.
    pub default: Option<serde_json::Value>,
}

impl Field {
    /// Required takes precedence over a default when a schema lists both.
    pub fn state(&self) -> FieldState {
        if self.required {
            FieldState::Required
        } else if self.default.is_some() {
            FieldState::Defaulted
        } else {
            FieldState::Optional
        }
    }
}

/// Policy for keys a struct does not declare.
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    /// Extra keys are kept as opaque structured data.
    FreeForm,
    /// Extra keys map to values of this type.
    Typed(FieldType),
}

/// A named record.
#[derive(Debug, Clone)]
pub struct Struct {
    pub name: String,
    /// Fields in schema property order.
    pub fields: Vec<Field>,
    pub description: Option<String>,
    /// `None` when no extra keys are allowed.
    pub additional_props: Option<AdditionalProperties>,
}

impl Struct {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A named closed set of string values.
#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    /// Values in schema order.
    pub values: Vec<String>,
}

/// One top-level entry of the resolved sequence.
#[derive(Debug, Clone)]
pub enum IrNode {
    Struct(Rc<Struct>),
    Enum(Rc<Enum>),
    ForwardRef(String),
}

impl IrNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Struct(s) => &s.name,
            Self::Enum(e) => &e.name,
            Self::ForwardRef(name) => name,
        }
    }
}

/// The ordered output of one resolution pass.
///
/// Order matters: forward declarations and every dependency of a struct
/// precede the struct itself.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    nodes: Vec<IrNode>,
}

impl Resolution {
    pub fn new(nodes: Vec<IrNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[IrNode] {
        &self.nodes
    }

    pub fn structs(&self) -> impl Iterator<Item = &Rc<Struct>> {
        self.nodes.iter().filter_map(|n| match n {
            IrNode::Struct(s) => Some(s),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &Rc<Enum>> {
        self.nodes.iter().filter_map(|n| match n {
            IrNode::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn forward_refs(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n {
            IrNode::ForwardRef(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Look up the full struct or enum node for a definition name.
    ///
    /// This is how a [`FieldType::ForwardRef`] is resolved downstream.
    pub fn definition(&self, name: &str) -> Option<&IrNode> {
        self.nodes
            .iter()
            .find(|n| !matches!(n, IrNode::ForwardRef(_)) && n.name() == name)
    }
}
