use crate::error::GraphError;
use crate::graph::ClassGraphBuilder;
use crate::ir::TypeDescriptor;
use crate::naming::singularize;
use crate::value::SchemaValue;

/// Every element must infer to the same type as the first one; otherwise the
/// whole field becomes `SequenceOf(String)`.
pub(super) fn infer_sequence(
    builder: &mut ClassGraphBuilder<'_>,
    field_name: &str,
    xs: &[SchemaValue],
    namespace: &[String],
) -> Result<TypeDescriptor, GraphError> {
    let Some((first, rest)) = xs.split_first() else {
        return Ok(TypeDescriptor::string_sequence());
    };

    builder.enter(field_name)?;
    let result = infer_elements(builder, field_name, first, rest, namespace);
    builder.leave();
    result
}

fn infer_elements(
    builder: &mut ClassGraphBuilder<'_>,
    field_name: &str,
    first: &SchemaValue,
    rest: &[SchemaValue],
    namespace: &[String],
) -> Result<TypeDescriptor, GraphError> {
    let elem = infer_element(builder, field_name, first, namespace)?;
    for (i, x) in rest.iter().enumerate() {
        if infer_element(builder, field_name, x, namespace)? != elem {
            tracing::debug!(
                field = field_name,
                index = i + 1,
                kind = x.kind(),
                "inconsistent sequence element; falling back to strings"
            );
            return Ok(TypeDescriptor::string_sequence());
        }
    }
    Ok(TypeDescriptor::SequenceOf(Box::new(elem)))
}

fn infer_element(
    builder: &mut ClassGraphBuilder<'_>,
    field_name: &str,
    value: &SchemaValue,
    namespace: &[String],
) -> Result<TypeDescriptor, GraphError> {
    match value {
        SchemaValue::Mapping(m) => {
            let class_name = super::class_name_for(singularize(field_name));
            Ok(TypeDescriptor::ClassRef(builder.build(&class_name, m, namespace)?))
        }
        other => super::infer(builder, field_name, other, namespace),
    }
}
