//! Date and time strings in a fixed strftime format
//!
//! Parsing is lenient by default: a calendar date that does not exist, such
//! as `2023-02-30`, rolls over into the following month. Strict checks report
//! it instead.

use chrono::format::{self, Item, ParseErrorKind, StrftimeItems};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use plan_core::{
    Invalid, Path, SchemaError, SchemaResult, Validate, ValidationResult, Validator, Value,
};

/// Result of parsing with a format that may carry only a date or a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

const INVALID_DATE: &str = "the parsed date was invalid";

struct DateTimeFormat {
    format: String,
    /// Return the parsed value instead of the input string
    parse: bool,
    /// Reject calendar dates that would otherwise roll over
    strict: bool,
}

impl DateTimeFormat {
    fn parse_str(&self, text: &str) -> Result<Parsed, String> {
        let mut fields = format::Parsed::new();
        format::parse(&mut fields, text, StrftimeItems::new(&self.format))
            .map_err(|error| error.to_string())?;

        if let Ok(datetime) = fields.to_naive_datetime_with_offset(0) {
            return Ok(Parsed::DateTime(datetime));
        }

        let date = match fields.to_naive_date() {
            Ok(date) => Ok(date),
            Err(error) if error.kind() == ParseErrorKind::NotEnough => Err(error.to_string()),
            Err(error) => match rolled_over(&fields) {
                Some(_) if self.strict => return Err(INVALID_DATE.to_string()),
                Some(date) => Ok(date),
                None => return Err(error.to_string()),
            },
        };
        let time = match fields.to_naive_time() {
            Ok(time) => Some(time),
            Err(error) if error.kind() == ParseErrorKind::NotEnough => None,
            Err(error) => return Err(error.to_string()),
        };

        // The format may describe only a date or only a time
        match (date, time) {
            (Ok(date), Some(time)) => Ok(Parsed::DateTime(date.and_time(time))),
            (Ok(date), None) => Ok(Parsed::Date(date)),
            (Err(_), Some(time)) => Ok(Parsed::Time(time)),
            (Err(problem), None) => Err(problem),
        }
    }
}

/// The date a day overflow lands on, `None` unless the day is the only problem
fn rolled_over(fields: &format::Parsed) -> Option<NaiveDate> {
    let (year, month, day) = (fields.year()?, fields.month()?, fields.day()?);
    if NaiveDate::from_ymd_opt(year, month, day).is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_days(Days::new(u64::from(day).saturating_sub(1)))
}

impl Validate for DateTimeFormat {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let Some(text) = value.as_str() else {
            return Err(Invalid::new("Datetime format {format} for {value} failed")
                .with_param("format", self.format.as_str())
                .with_param("value", value.repr())
                .at(path)
                .into());
        };
        match self.parse_str(text) {
            Ok(parsed) if self.parse => Ok(Value::object(parsed)),
            Ok(_) => Ok(value.clone()),
            Err(problem) => Err(Invalid::new(
                "Datetime format {format} for {value} failed: {problem}",
            )
            .with_param("format", self.format.as_str())
            .with_param("value", value.repr())
            .with_param("problem", problem)
            .at(path)
            .into()),
        }
    }
}

fn compiled(format: &str, parse: bool, strict: bool) -> SchemaResult<Validator> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(SchemaError::InvalidFormat {
            format: format.to_string(),
        });
    }
    Ok(Validator::new(
        "datetime",
        DateTimeFormat {
            format: format.to_string(),
            parse,
            strict,
        },
    ))
}

/// Accept strings following `format`, returning them unchanged
pub fn assert(format: &str, strict: bool) -> SchemaResult<Validator> {
    compiled(format, false, strict)
}

/// Accept strings following `format`, returning a [`Parsed`] host object
pub fn parse(format: &str, strict: bool) -> SchemaResult<Validator> {
    compiled(format, true, strict)
}
