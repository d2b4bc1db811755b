//! Decoded document tree handed to the inference engine.
//!
//! The engine never sees `serde_yaml::Value` directly; sources are converted
//! once at the edge so inference stays parser-agnostic.
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::error::DocumentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    String(String),
    Sequence(Vec<SchemaValue>),
    Mapping(IndexMap<String, SchemaValue>),
}

impl SchemaValue {
    pub fn as_mapping(&self) -> Option<&IndexMap<String, SchemaValue>> {
        match self {
            SchemaValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Short kind label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaValue::Null => "null",
            SchemaValue::Bool(_) => "bool",
            SchemaValue::Int(_) => "integer",
            SchemaValue::Float(_) => "float",
            SchemaValue::String(_) => "string",
            SchemaValue::Sequence(_) => "sequence",
            SchemaValue::Mapping(_) => "mapping",
        }
    }
}

impl TryFrom<serde_yaml::Value> for SchemaValue {
    type Error = DocumentError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        use serde_yaml::Value;
        Ok(match value {
            Value::Null => SchemaValue::Null,
            Value::Bool(b) => SchemaValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SchemaValue::Int(i)
                } else {
                    // u64 above i64::MAX lands here too (lossy, but still numeric)
                    SchemaValue::Float(OrderedFloat(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => SchemaValue::String(s),
            Value::Sequence(xs) => SchemaValue::Sequence(
                xs.into_iter().map(SchemaValue::try_from).collect::<Result<_, _>>()?,
            ),
            Value::Mapping(m) => {
                let mut out = IndexMap::with_capacity(m.len());
                for (k, v) in m {
                    out.insert(mapping_key(k)?, SchemaValue::try_from(v)?);
                }
                SchemaValue::Mapping(out)
            }
            Value::Tagged(tagged) => SchemaValue::try_from(tagged.value)?,
        })
    }
}

fn mapping_key(key: serde_yaml::Value) -> Result<String, DocumentError> {
    use serde_yaml::Value;
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => mapping_key(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err(DocumentError::UnsupportedKey),
    }
}

/// Parse YAML text straight into a [`SchemaValue`].
pub fn from_yaml_str(src: &str) -> Result<SchemaValue, DocumentError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(src)?;
    SchemaValue::try_from(raw)
}
