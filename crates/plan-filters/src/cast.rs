//! Type casts
//!
//! [`to`] converts between kinds and fails on conversions that make no
//! sense (a map into an integer). The `*val` helpers never fail and fall
//! back to zero-like values, the way loose scripting casts do.

use indexmap::IndexMap;
use plan_core::{
    Invalid, Key, Kind, Path, SchemaError, SchemaResult, Validate, ValidationResult, Validator,
    Value,
};

struct Cast {
    kind: Kind,
}

impl Validate for Cast {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        cast(value, self.kind).ok_or_else(|| {
            Invalid::new("Cannot cast {data} into {type}")
                .with_param("data", value.repr())
                .with_param("type", self.kind.name())
                .at(path)
                .into()
        })
    }
}

/// Cast into `kind`; `null` and `object` are not valid targets
pub fn to(kind: Kind) -> SchemaResult<Validator> {
    match kind {
        Kind::Null | Kind::Object => Err(SchemaError::unsupported(kind.name())),
        _ => Ok(Validator::new("cast", Cast { kind })),
    }
}

fn cast(value: &Value, kind: Kind) -> Option<Value> {
    if value.kind() == kind {
        return Some(value.clone());
    }
    match kind {
        Kind::Bool => Some(Value::Bool(truthy(value))),
        Kind::Int => match value {
            Value::Null => Some(Value::Int(0)),
            Value::Bool(b) => Some(Value::Int(i64::from(*b))),
            Value::Float(f) if f.is_finite() => Some(Value::Int(f.trunc() as i64)),
            Value::Str(s) => Some(Value::Int(leading_int(s, 10))),
            _ => None,
        },
        Kind::Float => match value {
            Value::Null => Some(Value::Float(0.0)),
            Value::Bool(b) => Some(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Int(i) => Some(Value::Float(*i as f64)),
            Value::Str(s) => Some(Value::Float(leading_float(s))),
            _ => None,
        },
        Kind::Str => match value {
            Value::Null => Some(Value::from("")),
            Value::Bool(b) => Some(Value::from(if *b { "1" } else { "" })),
            Value::Int(i) => Some(Value::Str(i.to_string())),
            Value::Float(f) => Some(Value::Str(f.to_string())),
            _ => None,
        },
        Kind::List => match value {
            Value::Null => Some(Value::List(Vec::new())),
            Value::Map(map) => Some(Value::List(map.values().cloned().collect())),
            other => Some(Value::List(vec![other.clone()])),
        },
        Kind::Map => match value {
            Value::Null => Some(Value::Map(IndexMap::new())),
            Value::List(items) => Some(Value::Map(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (Key::Index(i), v.clone()))
                    .collect(),
            )),
            other => Some(Value::map([(Key::Index(0), other.clone())])),
        },
        Kind::Null | Kind::Object => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Str(s) => !(s.is_empty() || s == "0"),
        Value::List(items) => !items.is_empty(),
        Value::Map(map) => !map.is_empty(),
        Value::Object(_) => true,
    }
}

/// Integer spelled by the longest valid prefix of `s`, or 0
fn leading_int(s: &str, base: u32) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = match base {
        16 => strip_radix_prefix(digits, &["0x", "0X"]),
        8 => strip_radix_prefix(digits, &["0o", "0O"]),
        2 => strip_radix_prefix(digits, &["0b", "0B"]),
        _ => digits,
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(base))
        .map_or(digits.len(), |(i, _)| i);
    let magnitude = i64::from_str_radix(&digits[..end], base).unwrap_or(if end == 0 {
        0
    } else {
        i64::MAX
    });
    if negative {
        magnitude.saturating_neg()
    } else {
        magnitude
    }
}

fn strip_radix_prefix<'a>(s: &'a str, prefixes: &[&str]) -> &'a str {
    prefixes
        .iter()
        .find_map(|prefix| s.strip_prefix(prefix))
        .unwrap_or(s)
}

/// Float spelled by the longest valid prefix of `s`, or 0.0
fn leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        mantissa_digits += fraction_end - fraction_start;
        if mantissa_digits > 0 {
            end = fraction_end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }
    s[..end].parse().unwrap_or(0.0)
}

/// Loose boolean cast; never fails
pub fn boolval() -> Validator {
    fn to_bool(value: &Value, _: &Path) -> ValidationResult {
        Ok(Value::Bool(truthy(value)))
    }
    Validator::new("boolval", to_bool)
}

/// Loose integer cast reading strings in `base`; never fails
pub fn intval(base: u32) -> SchemaResult<Validator> {
    if !(2..=36).contains(&base) {
        return Err(SchemaError::InvalidArgument {
            argument: "base".to_string(),
            reason: format!("{base} is outside 2..=36"),
        });
    }
    Ok(Validator::new(
        "intval",
        move |value: &Value, _: &Path| -> ValidationResult {
            let int = match value {
                Value::Int(i) => *i,
                Value::Str(s) => leading_int(s, base),
                Value::Float(f) if f.is_finite() => f.trunc() as i64,
                Value::Float(_) => 0,
                other => i64::from(truthy(other)),
            };
            Ok(Value::Int(int))
        },
    ))
}

/// Loose float cast; never fails
pub fn floatval() -> Validator {
    fn to_float(value: &Value, _: &Path) -> ValidationResult {
        let float = match value {
            Value::Float(f) => *f,
            Value::Int(i) => *i as f64,
            Value::Str(s) => leading_float(s),
            other => {
                if truthy(other) {
                    1.0
                } else {
                    0.0
                }
            }
        };
        Ok(Value::Float(float))
    }
    Validator::new("floatval", to_float)
}

/// String cast of scalars; containers and objects fail
pub fn strval() -> Validator {
    Validator::new("cast", Cast { kind: Kind::Str })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(validator: &Validator, value: Value) -> Value {
        validator.call(&value).unwrap()
    }

    #[test]
    fn test_to_integer() {
        let validator = to(Kind::Int).unwrap();
        assert_eq!(run(&validator, Value::from("42")), Value::Int(42));
        assert_eq!(run(&validator, Value::from("12abc")), Value::Int(12));
        assert_eq!(run(&validator, Value::Float(3.9)), Value::Int(3));
        assert_eq!(run(&validator, Value::Bool(true)), Value::Int(1));
        let err = validator.call(&Value::list([1])).unwrap_err();
        assert_eq!(err.message(), "Cannot cast [1] into integer");
    }

    #[test]
    fn test_to_float_and_string() {
        let float = to(Kind::Float).unwrap();
        assert_eq!(run(&float, Value::from("2.5e1x")), Value::Float(25.0));
        assert_eq!(run(&float, Value::Int(2)), Value::Float(2.0));

        let string = to(Kind::Str).unwrap();
        assert_eq!(run(&string, Value::Int(2)), Value::from("2"));
        assert_eq!(run(&string, Value::Bool(false)), Value::from(""));
        assert!(string.call(&Value::map([("a", 1)])).is_err());
    }

    #[test]
    fn test_to_containers() {
        let list = to(Kind::List).unwrap();
        assert_eq!(run(&list, Value::Int(1)), Value::list([1]));
        assert_eq!(run(&list, Value::map([("a", 1), ("b", 2)])), Value::list([1, 2]));

        let map = to(Kind::Map).unwrap();
        assert_eq!(
            run(&map, Value::list(["x"])),
            Value::map([(Key::Index(0), Value::from("x"))])
        );
    }

    #[test]
    fn test_to_rejects_null_and_object_targets() {
        assert_eq!(to(Kind::Null).unwrap_err(), SchemaError::unsupported("null"));
        assert!(to(Kind::Object).is_err());
    }

    #[test]
    fn test_boolval() {
        let validator = boolval();
        assert_eq!(run(&validator, Value::from("0")), Value::Bool(false));
        assert_eq!(run(&validator, Value::from("false")), Value::Bool(true));
        assert_eq!(run(&validator, Value::list(Vec::<Value>::new())), Value::Bool(false));
    }

    #[test]
    fn test_intval_bases() {
        assert_eq!(run(&intval(10).unwrap(), Value::from("  -17 apples")), Value::Int(-17));
        assert_eq!(run(&intval(16).unwrap(), Value::from("0x1A")), Value::Int(26));
        assert_eq!(run(&intval(2).unwrap(), Value::from("101")), Value::Int(5));
        assert_eq!(run(&intval(10).unwrap(), Value::from("abc")), Value::Int(0));
        assert_eq!(run(&intval(10).unwrap(), Value::Null), Value::Int(0));
        assert!(intval(1).is_err());
        assert!(intval(37).is_err());
    }

    #[test]
    fn test_floatval() {
        let validator = floatval();
        assert_eq!(run(&validator, Value::from("1.5kg")), Value::Float(1.5));
        assert_eq!(run(&validator, Value::from(".5")), Value::Float(0.5));
        assert_eq!(run(&validator, Value::from("e5")), Value::Float(0.0));
        assert_eq!(run(&validator, Value::Bool(true)), Value::Float(1.0));
    }
}
