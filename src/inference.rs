//! Type inference: one document value → one [`TypeDescriptor`].
//!
//! Mapping values (and sequences of mappings) are turned into classes through
//! the [`ClassGraphBuilder`], so inferring a field may register new classes as
//! a side effect.
//!
//! Policy:
//! - Integers stay `Int`; they are not unified with `Float`. A sequence mixing
//!   the two is inconsistent and falls back like any other mix.
//! - `null` is a `String` (no nullable types).
//! - Empty or inconsistent sequences are `SequenceOf(String)` for the whole
//!   field; there are no per-element unions.
pub mod seq;

use crate::error::GraphError;
use crate::graph::ClassGraphBuilder;
use crate::ir::{PrimitiveKind, TypeDescriptor};
use crate::naming::name_case;
use crate::value::SchemaValue;

const ANONYMOUS_CLASS: &str = "Anonymous";

pub fn infer(
    builder: &mut ClassGraphBuilder<'_>,
    field_name: &str,
    value: &SchemaValue,
    namespace: &[String],
) -> Result<TypeDescriptor, GraphError> {
    Ok(match value {
        SchemaValue::Null => TypeDescriptor::string(),
        SchemaValue::Bool(_) => TypeDescriptor::Primitive(PrimitiveKind::Bool),
        SchemaValue::Int(_) => TypeDescriptor::Primitive(PrimitiveKind::Int),
        SchemaValue::Float(_) => TypeDescriptor::Primitive(PrimitiveKind::Float),
        SchemaValue::String(_) => TypeDescriptor::string(),
        SchemaValue::Sequence(xs) => seq::infer_sequence(builder, field_name, xs, namespace)?,
        SchemaValue::Mapping(m) => {
            let fqn = builder.build(&class_name_for(field_name), m, namespace)?;
            TypeDescriptor::ClassRef(fqn)
        }
    })
}

/// Class name for a mapping found under `field_name`.
pub fn class_name_for(field_name: &str) -> String {
    let name = name_case(field_name);
    if name.is_empty() { ANONYMOUS_CLASS.to_string() } else { name }
}

// ------------------------------- Tests ------------------------------------ //
