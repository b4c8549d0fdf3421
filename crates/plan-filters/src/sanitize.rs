//! Removal of characters not allowed in URLs and e-mail addresses

use plan_core::{Invalid, Path, Validate, ValidationResult, Validator, Value};

const URL_SYMBOLS: &str = "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=";
const EMAIL_SYMBOLS: &str = "!#$%&'*+-=?^_`{|}~@.[]";

struct Sanitize {
    name: &'static str,
    symbols: &'static str,
}

impl Sanitize {
    fn allowed(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || self.symbols.contains(c)
    }
}

impl Validate for Sanitize {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let text = match value {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => String::from(if *b { "1" } else { "" }),
            other => {
                return Err(Invalid::new("Sanitization {name} for {value} failed")
                    .with_param("name", self.name)
                    .with_param("value", other.repr())
                    .at(path)
                    .into())
            }
        };
        Ok(Value::Str(text.chars().filter(|c| self.allowed(*c)).collect()))
    }
}

/// Keep letters, digits and the symbols URLs may contain
pub fn url() -> Validator {
    Validator::new(
        "sanitize",
        Sanitize {
            name: "url",
            symbols: URL_SYMBOLS,
        },
    )
}

/// Keep letters, digits and the symbols e-mail addresses may contain
pub fn email() -> Validator {
    Validator::new(
        "sanitize",
        Sanitize {
            name: "email",
            symbols: EMAIL_SYMBOLS,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        let output = url().call(&Value::from("http://exa mple.org/ä?q=1")).unwrap();
        assert_eq!(output, Value::from("http://example.org/?q=1"));
    }

    #[test]
    fn test_email() {
        let output = email().call(&Value::from("(john)@exa mple.org")).unwrap();
        assert_eq!(output, Value::from("john@example.org"));
    }

    #[test]
    fn test_scalars_are_stringified() {
        assert_eq!(email().call(&Value::Int(42)).unwrap(), Value::from("42"));
    }

    #[test]
    fn test_containers_fail() {
        let err = url().call(&Value::list(["a"])).unwrap_err();
        assert_eq!(err.message(), "Sanitization url for [\"a\"] failed");
    }
}
