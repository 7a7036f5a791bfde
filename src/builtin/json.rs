//! Building values from JSON at a dynamic boundary, where the expected type is
//! only known at runtime (configuration-driven pipelines and the like).

use crate::xerror::XError;
use crate::xtype::{XStructSpec, XType, X_BOOL, X_FLOAT, X_INT, X_STR, X_UNIT};
use crate::xvalue::{XSequence, XStruct, XValue};
use serde_json::Value;
use std::sync::Arc;

/// The closest runtime type to a raw JSON value, used for diagnostics only.
fn json_type(value: &Value) -> Arc<XType> {
    match value {
        Value::Null => X_UNIT.clone(),
        Value::Bool(_) => X_BOOL.clone(),
        Value::Number(n) if n.is_i64() => X_INT.clone(),
        Value::Number(_) => X_FLOAT.clone(),
        Value::String(_) => X_STR.clone(),
        Value::Array(items) => XType::sequence(
            items
                .first()
                .map(json_type)
                .unwrap_or_else(|| X_UNIT.clone()),
        ),
        Value::Object(_) => Arc::new(XType::Struct(Arc::new(XStructSpec::empty("object")))),
    }
}

/// Decode `value` as an instance of `xtype`.
///
/// Structs are read from objects keyed by field name, tuples and sequences from arrays.
/// Functions cannot be decoded.
pub fn decode(value: &Value, xtype: &Arc<XType>) -> Result<XValue, XError> {
    let mismatch = || XError::TypeMismatch {
        expected: xtype.clone(),
        actual: json_type(value),
    };
    match (xtype.as_ref(), value) {
        (XType::Unit, Value::Null) => Ok(XValue::Unit),
        (XType::Bool, Value::Bool(b)) => Ok(XValue::Bool(*b)),
        (XType::Int, Value::Number(n)) => n.as_i64().map(XValue::Int).ok_or_else(mismatch),
        (XType::Float, Value::Number(n)) => n.as_f64().map(XValue::Float).ok_or_else(mismatch),
        (XType::Str, Value::String(s)) => Ok(XValue::Str(s.clone())),
        (XType::Struct(spec), Value::Object(map)) => {
            let fields = spec
                .fields
                .iter()
                .map(|field| match map.get(&field.name) {
                    Some(v) => decode(v, &field.type_),
                    None => Err(XError::TypeMismatch {
                        expected: field.type_.clone(),
                        actual: X_UNIT.clone(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(XStruct::new(spec.clone(), fields)?.into())
        }
        (XType::Tuple(types), Value::Array(items)) if types.len() == items.len() => items
            .iter()
            .zip(types.iter())
            .map(|(v, t)| decode(v, t))
            .collect::<Result<Vec<_>, _>>()
            .map(XValue::Tuple),
        (XType::Sequence(elem), Value::Array(items)) => {
            let items = items
                .iter()
                .map(|v| decode(v, elem))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(XSequence::new(elem.clone(), items)?.into())
        }
        _ => Err(mismatch()),
    }
}

/// Encode a value as JSON. Functions become `null`.
pub fn encode(value: &XValue) -> Value {
    match value {
        XValue::Unit | XValue::Function(_) => Value::Null,
        XValue::Bool(b) => Value::Bool(*b),
        XValue::Int(i) => Value::from(*i),
        XValue::Float(f) => Value::from(*f),
        XValue::Str(s) => Value::String(s.clone()),
        XValue::Struct(s) => Value::Object(
            s.spec()
                .fields
                .iter()
                .zip(s.fields().iter())
                .map(|(spec, v)| (spec.name.clone(), encode(v)))
                .collect(),
        ),
        XValue::Tuple(items) => Value::Array(items.iter().map(encode).collect()),
        XValue::Sequence(seq) => Value::Array(seq.iter().map(encode).collect()),
    }
}
