//! Closed typed-value model and the classifier that builds it.
//!
//! Every raw `serde_json::Value` is classified once into a [`TypedValue`];
//! later stages only ever pattern-match on the closed set.
use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::path::JsonPath;

/// Key reserved for the "this call fails" sentinel in expected values.
pub const ERROR_KEY: &str = "error";

// ------------------------------- Types ----------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum TypedValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(OrderedFloat<f64>),
    String(String),
    Array(Vec<TypedValue>),
    Map(IndexMap<String, TypedValue>),
    /// Only ever the top-level expected value of a leaf.
    Error(String),
}

/// Shape-level tag of a [`TypedValue`], ignoring element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Double,
    String,
    Array,
    Map,
    Unknown,
}

/// Which field of a leaf a value comes from. Decides whether the
/// error sentinel is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Input,
    Expected,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("unclassifiable value at {path}: {shape}")]
    Unclassifiable { path: JsonPath, shape: String },
    #[error("input at {path} uses the reserved `error` sentinel (message: {message:?})")]
    MalformedInput { path: JsonPath, message: String },
}

impl TypedValue {
    /// Top-level kind. `Error` maps to `Unknown`: a failing call says
    /// nothing about the return type.
    pub fn kind(&self) -> Kind {
        match self {
            TypedValue::Null => Kind::Null,
            TypedValue::Bool(_) => Kind::Bool,
            TypedValue::Int(_) => Kind::Int,
            TypedValue::Double(_) => Kind::Double,
            TypedValue::String(_) => Kind::String,
            TypedValue::Array(_) => Kind::Array,
            TypedValue::Map(_) => Kind::Map,
            TypedValue::Error(_) => Kind::Unknown,
        }
    }

    pub fn is_error(&self) -> bool { matches!(self, TypedValue::Error(_)) }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "Null",
            Kind::Bool => "Bool",
            Kind::Int => "Int",
            Kind::Double => "Double",
            Kind::String => "String",
            Kind::Array => "Array",
            Kind::Map => "Map",
            Kind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

// ------------------------------ Classify --------------------------------- //

/// Classify one raw value found at `path`.
///
/// The `{"error": "<message>"}` sentinel is only meaningful at the top of an
/// expected value; at the top of an input entry it is rejected. Below the
/// top level it is an ordinary map.
pub fn classify(value: &Value, role: Role, path: &JsonPath) -> Result<TypedValue, ValueError> {
    if let Value::Object(map) = value {
        if let Some(message) = error_sentinel(map) {
            return match role {
                Role::Expected => Ok(TypedValue::Error(message.to_string())),
                Role::Input => Err(ValueError::MalformedInput {
                    path: path.clone(),
                    message: message.to_string(),
                }),
            };
        }
    }
    classify_nested(value, path)
}

fn classify_nested(value: &Value, path: &JsonPath) -> Result<TypedValue, ValueError> {
    match value {
        Value::Null => Ok(TypedValue::Null),
        Value::Bool(b) => Ok(TypedValue::Bool(*b)),
        Value::Number(n) => classify_number(n, path),
        Value::String(s) => Ok(TypedValue::String(s.clone())),
        Value::Array(xs) => xs
            .iter()
            .enumerate()
            .map(|(i, x)| classify_nested(x, &path.index(i)))
            .collect::<Result<Vec<_>, ValueError>>()
            .map(TypedValue::Array),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), classify_nested(v, &path.key(k.as_str()))?)))
            .collect::<Result<IndexMap<_, _>, ValueError>>()
            .map(TypedValue::Map),
    }
}

// The literal's shape decides: `1` is Int, `1.0` and `1e3` are Double.
// Numbers keep their source text (serde_json `arbitrary_precision`), so an
// integer literal is never silently rounded into a float.
fn classify_number(n: &Number, path: &JsonPath) -> Result<TypedValue, ValueError> {
    let literal = n.to_string();
    if !literal.contains(['.', 'e', 'E']) {
        return n.as_i64().map(TypedValue::Int).ok_or_else(|| ValueError::Unclassifiable {
            path: path.clone(),
            shape: format!("integer literal {literal} outside the 64-bit signed range"),
        });
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => Ok(TypedValue::Double(OrderedFloat(f))),
        _ => Err(ValueError::Unclassifiable {
            path: path.clone(),
            shape: format!("non-finite number {literal}"),
        }),
    }
}

fn error_sentinel(map: &Map<String, Value>) -> Option<&str> {
    map.get(ERROR_KEY).and_then(Value::as_str)
}

/// Runtime shape name of a raw value, for diagnostics.
pub fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn expected(v: Value) -> Result<TypedValue, ValueError> {
        classify(&v, Role::Expected, &JsonPath::root())
    }

    fn input(v: Value) -> Result<TypedValue, ValueError> {
        classify(&v, Role::Input, &JsonPath::root().key("input").key("x"))
    }

    #[test]
    fn scalars() {
        assert_eq!(input(json!(null)).unwrap(), TypedValue::Null);
        assert_eq!(input(json!(true)).unwrap(), TypedValue::Bool(true));
        assert_eq!(input(json!("hi")).unwrap(), TypedValue::String("hi".into()));
        assert_eq!(input(json!(-3)).unwrap(), TypedValue::Int(-3));
    }

    #[test]
    fn numeric_literal_shape_decides_int_vs_double() {
        let v: Value = serde_json::from_str("[1, 1.0, 2.5e3]").unwrap();
        let got = input(v).unwrap();
        assert_eq!(
            got,
            TypedValue::Array(vec![
                TypedValue::Int(1),
                TypedValue::Double(OrderedFloat(1.0)),
                TypedValue::Double(OrderedFloat(2500.0)),
            ])
        );
    }

    #[test]
    fn integer_literals_outside_i64_are_unclassifiable() {
        for literal in [
            "9223372036854775808",
            "-9223372036854775809",
            "18446744073709551615",
            "18446744073709551616",
            "123456789012345678901234567890",
        ] {
            let v: Value = serde_json::from_str(literal).unwrap();
            match input(v) {
                Err(ValueError::Unclassifiable { path, shape }) => {
                    assert_eq!(path.to_string(), "$.input.x");
                    assert!(shape.contains(literal), "{shape}");
                }
                other => panic!("{literal}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn i64_bounds_stay_int() {
        let v: Value = serde_json::from_str("[9223372036854775807, -9223372036854775808]").unwrap();
        assert_eq!(
            input(v).unwrap(),
            TypedValue::Array(vec![TypedValue::Int(i64::MAX), TypedValue::Int(i64::MIN)])
        );
    }

    #[test]
    fn exponent_literals_are_double() {
        let v: Value = serde_json::from_str("[1E2, 1e-1, 20000000000000000000.0]").unwrap();
        let kinds: Vec<_> = match input(v).unwrap() {
            TypedValue::Array(xs) => xs.iter().map(TypedValue::kind).collect(),
            other => panic!("expected array, got {other:?}"),
        };
        assert_eq!(kinds, [Kind::Double, Kind::Double, Kind::Double]);
    }

    #[test]
    fn arrays_keep_order_and_duplicates() {
        let got = input(json!([3, 1, 3, null])).unwrap();
        assert_eq!(
            got,
            TypedValue::Array(vec![
                TypedValue::Int(3),
                TypedValue::Int(1),
                TypedValue::Int(3),
                TypedValue::Null,
            ])
        );
    }

    #[test]
    fn maps_keep_insertion_order() {
        let got = input(json!({"z": 1, "a": [true], "m": {"k": "v"}})).unwrap();
        let TypedValue::Map(entries) = got else { panic!("expected map") };
        let keys: Vec<_> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(entries["a"], TypedValue::Array(vec![TypedValue::Bool(true)]));
    }

    #[test]
    fn error_sentinel_in_expected_position() {
        assert_eq!(
            expected(json!({"error": "msg"})).unwrap(),
            TypedValue::Error("msg".into())
        );
    }

    #[test]
    fn error_sentinel_in_input_position_is_rejected() {
        let err = input(json!({"error": "msg"})).unwrap_err();
        assert_eq!(
            err,
            ValueError::MalformedInput {
                path: JsonPath::root().key("input").key("x"),
                message: "msg".into(),
            }
        );
    }

    #[test]
    fn non_string_error_key_is_a_plain_map() {
        let got = expected(json!({"error": 4})).unwrap();
        assert_eq!(got.kind(), Kind::Map);
    }

    #[test]
    fn nested_sentinel_shape_is_a_plain_map() {
        let got = expected(json!([{"error": "inner"}])).unwrap();
        let TypedValue::Array(items) = got else { panic!("expected array") };
        assert_eq!(items[0].kind(), Kind::Map);
    }

    #[test]
    fn error_kind_is_unknown() {
        assert_eq!(TypedValue::Error("x".into()).kind(), Kind::Unknown);
        assert!(TypedValue::Error("x".into()).is_error());
    }

    #[test]
    fn classify_is_deterministic() {
        let raw = json!({"a": [1, 2.5, "s", null, {"b": false}]});
        assert_eq!(input(raw.clone()).unwrap(), input(raw).unwrap());
    }
}
