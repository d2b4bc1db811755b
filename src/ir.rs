// Strongly-typed class graph IR. No document values here.
use serde::Serialize;

/// Separator for fully-qualified class names.
pub const PATH_SEP: &str = "::";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    SequenceOf(Box<TypeDescriptor>),
    ClassRef(String),        // fully-qualified name, always already registered
}

impl TypeDescriptor {
    pub fn string() -> Self { TypeDescriptor::Primitive(PrimitiveKind::String) }

    /// The documented fallback for empty or inconsistent sequences.
    pub fn string_sequence() -> Self {
        TypeDescriptor::SequenceOf(Box::new(Self::string()))
    }

    /// Class this type ultimately points at, looking through sequences.
    pub fn class_ref(&self) -> Option<&str> {
        match self {
            TypeDescriptor::ClassRef(fqn) => Some(fqn),
            TypeDescriptor::SequenceOf(inner) => inner.class_ref(),
            TypeDescriptor::Primitive(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub source_key: String,      // document lookup key, verbatim
    pub sanitized_name: String,  // member identifier
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDefinition {
    pub name: String,
    pub namespace: Vec<String>,
    pub fields: Vec<Field>,      // document order
}

impl ClassDefinition {
    pub fn fully_qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }
}

pub fn qualify(namespace: &[String], name: &str) -> String {
    if namespace.is_empty() {
        return name.to_string();
    }
    let mut out = namespace.join(PATH_SEP);
    out.push_str(PATH_SEP);
    out.push_str(name);
    out
}

/// Split a fully-qualified name back into `(namespace, name)`.
pub fn split_qualified(fqn: &str) -> (Vec<String>, String) {
    let mut parts: Vec<String> = fqn.split(PATH_SEP).map(str::to_string).collect();
    let name = parts.pop().unwrap_or_default();
    (parts, name)
}
