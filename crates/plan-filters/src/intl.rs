//! Unicode-aware character filters

use plan_core::{
    Invalid, Kind, Path, SchemaError, SchemaResult, Validate, ValidationResult, Validator, Value,
};
use regex::Regex;

struct Chars {
    /// Matches every character to drop; `None` drops everything
    disallowed: Option<Regex>,
}

impl Validate for Chars {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let text = match value {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            other => {
                return Err(Invalid::new("{data} is not {type}")
                    .with_param("data", other.repr())
                    .with_param("type", Kind::Str.name())
                    .at(path)
                    .into())
            }
        };
        let kept = match &self.disallowed {
            Some(regex) => regex.replace_all(&text, "").into_owned(),
            None => String::new(),
        };
        Ok(Value::Str(kept))
    }
}

/// Keep only the selected classes of characters
pub fn chars(lower: bool, upper: bool, number: bool, whitespace: bool) -> SchemaResult<Validator> {
    let mut classes = String::new();
    if whitespace {
        classes.push_str(r"\s");
    }
    match (lower, upper) {
        (true, true) => classes.push_str(r"\p{L}"),
        (true, false) => classes.push_str(r"\p{Ll}"),
        (false, true) => classes.push_str(r"\p{Lu}"),
        (false, false) => {}
    }
    if number {
        classes.push_str(r"\p{N}");
    }

    let disallowed = if classes.is_empty() {
        None
    } else {
        let pattern = format!("[^{classes}]");
        let regex = Regex::new(&pattern).map_err(|e| SchemaError::InvalidPattern {
            pattern,
            reason: e.to_string(),
        })?;
        Some(regex)
    };
    Ok(Validator::new("chars", Chars { disallowed }))
}

/// Letters only, optionally keeping whitespace
pub fn alpha(whitespace: bool) -> SchemaResult<Validator> {
    chars(true, true, false, whitespace)
}

/// Letters and digits, optionally keeping whitespace
pub fn alnum(whitespace: bool) -> SchemaResult<Validator> {
    chars(true, true, true, whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(validator: SchemaResult<Validator>, input: &str) -> Value {
        validator.unwrap().call(&Value::from(input)).unwrap()
    }

    #[test]
    fn test_alpha_keeps_accented_letters() {
        assert_eq!(run(alpha(false), "Héllo, wörld 42!"), Value::from("Héllowörld"));
        assert_eq!(run(alpha(true), "Héllo, wörld 42!"), Value::from("Héllo wörld "));
    }

    #[test]
    fn test_alnum() {
        assert_eq!(run(alnum(false), "año 2024!"), Value::from("año2024"));
    }

    #[test]
    fn test_case_selection() {
        assert_eq!(run(chars(true, false, false, false), "AbCd"), Value::from("bd"));
        assert_eq!(run(chars(false, true, false, false), "AbCd"), Value::from("AC"));
        assert_eq!(run(chars(false, false, true, false), "a1b2"), Value::from("12"));
    }

    #[test]
    fn test_nothing_selected_drops_everything() {
        assert_eq!(run(chars(false, false, false, false), "abc"), Value::from(""));
    }

    #[test]
    fn test_containers_are_rejected() {
        let err = alpha(false).unwrap().call(&Value::list(["a"])).unwrap_err();
        assert_eq!(err.message(), "[\"a\"] is not string");
    }
}
