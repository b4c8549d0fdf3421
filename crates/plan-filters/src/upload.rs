//! Shape and status checks for uploaded-file descriptors

use plan_core::combinator::{Dict, Extra, Required};
use plan_core::{Invalid, Key, Path, SchemaResult, Validate, ValidationResult, Validator, Value};

/// Keys every descriptor carries
pub const DESCRIPTOR_KEYS: [&str; 5] = ["tmp_name", "size", "error", "name", "type"];

/// Upload status codes, as reported in the descriptor's `error` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Ok,
    IniSize,
    FormSize,
    Partial,
    NoFile,
    NoTmpDir,
    CantWrite,
    Extension,
    Unknown(i64),
}

impl UploadStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => UploadStatus::Ok,
            1 => UploadStatus::IniSize,
            2 => UploadStatus::FormSize,
            3 => UploadStatus::Partial,
            4 => UploadStatus::NoFile,
            6 => UploadStatus::NoTmpDir,
            7 => UploadStatus::CantWrite,
            8 => UploadStatus::Extension,
            other => UploadStatus::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            UploadStatus::Ok => 0,
            UploadStatus::IniSize => 1,
            UploadStatus::FormSize => 2,
            UploadStatus::Partial => 3,
            UploadStatus::NoFile => 4,
            UploadStatus::NoTmpDir => 6,
            UploadStatus::CantWrite => 7,
            UploadStatus::Extension => 8,
            UploadStatus::Unknown(code) => *code,
        }
    }

    /// Message template, `None` for a successful upload
    pub fn template(&self) -> Option<&'static str> {
        match self {
            UploadStatus::Ok => None,
            UploadStatus::IniSize => Some("File {name} exceeds upload limit"),
            UploadStatus::FormSize => Some("File {name} exceeds upload limit in form"),
            UploadStatus::Partial => Some("File {name} was only partially uploaded"),
            UploadStatus::NoFile => Some("No file was uploaded"),
            UploadStatus::NoTmpDir => Some("Missing temporary directory"),
            UploadStatus::CantWrite => Some("File {name} could not be written on disk"),
            UploadStatus::Extension => Some("File upload failed due to an extension"),
            UploadStatus::Unknown(_) => {
                Some("File {name} was not uploaded due to an unknown error")
            }
        }
    }
}

struct UploadFile {
    shape: Validator,
}

impl Validate for UploadFile {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let descriptor = self.shape.validate(value, path)?;

        let status = match descriptor.get(&Key::from("error")) {
            Some(Value::Int(code)) => UploadStatus::from_code(*code),
            Some(other) => {
                return Err(Invalid::new("{data} is not {type}")
                    .with_param("data", other.repr())
                    .with_param("type", "integer")
                    .at(&path.join("error"))
                    .into())
            }
            None => UploadStatus::NoFile,
        };

        match status.template() {
            None => Ok(descriptor),
            Some(template) => {
                let name = descriptor
                    .get(&Key::from("name"))
                    .map_or_else(|| Value::Null.repr(), Value::repr);
                // Codes outside the u32 range keep the default code
                Err(Invalid::new(template)
                    .with_param("name", name)
                    .with_code(u32::try_from(status.code()).unwrap_or_default())
                    .at(path)
                    .into())
            }
        }
    }
}

/// Require the descriptor keys and a successful upload status
pub fn file() -> SchemaResult<Validator> {
    let shape = Dict::empty()
        .required(Required::Keys(
            DESCRIPTOR_KEYS.iter().map(|k| Key::from(*k)).collect(),
        ))
        .extra(Extra::Deny)
        .build()?;
    Ok(Validator::new("file", UploadFile { shape }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(error: i64) -> Value {
        Value::map([
            ("tmp_name", Value::from("/tmp/php123")),
            ("size", Value::Int(2048)),
            ("error", Value::Int(error)),
            ("name", Value::from("avatar.png")),
            ("type", Value::from("image/png")),
        ])
    }

    #[test]
    fn test_successful_upload() {
        let validator = file().unwrap();
        let input = descriptor(0);
        assert_eq!(validator.call(&input).unwrap(), input);
    }

    #[test]
    fn test_status_messages() {
        let validator = file().unwrap();
        let err = validator.call(&descriptor(1)).unwrap_err();
        assert_eq!(err.message(), "File \"avatar.png\" exceeds upload limit");
        assert_eq!(err.code(), 1);

        let err = validator.call(&descriptor(4)).unwrap_err();
        assert_eq!(err.message(), "No file was uploaded");

        let err = validator.call(&descriptor(99)).unwrap_err();
        assert_eq!(
            err.message(),
            "File \"avatar.png\" was not uploaded due to an unknown error"
        );
    }

    #[test]
    fn test_negative_status_keeps_default_code() {
        let validator = file().unwrap();
        let err = validator.call(&descriptor(-1)).unwrap_err();
        assert_eq!(
            err.message(),
            "File \"avatar.png\" was not uploaded due to an unknown error"
        );
        assert_eq!(err.code(), 0);
        assert_eq!(UploadStatus::from_code(-1), UploadStatus::Unknown(-1));
    }

    #[test]
    fn test_missing_keys() {
        let validator = file().unwrap();
        let err = validator
            .call(&Value::map([("name", "avatar.png")]))
            .unwrap_err();
        let messages: Vec<&str> = err.flatten().iter().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec![
                "Required key tmp_name not provided",
                "Required key size not provided",
                "Required key error not provided",
                "Required key type not provided",
            ]
        );
    }

    #[test]
    fn test_status_codes_round_trip() {
        for code in [0, 1, 2, 3, 4, 6, 7, 8, 42] {
            assert_eq!(UploadStatus::from_code(code).code(), code);
        }
    }
}
