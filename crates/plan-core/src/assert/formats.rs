//! Named format checks available through `validate(name)`

use crate::value::Value;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use url::Url;

/// The closed set of named format checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Url,
    Email,
    Ip,
    Int,
    Float,
    Boolean,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Url,
        Format::Email,
        Format::Ip,
        Format::Int,
        Format::Float,
        Format::Boolean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Url => "url",
            Format::Email => "email",
            Format::Ip => "ip",
            Format::Int => "int",
            Format::Float => "float",
            Format::Boolean => "boolean",
        }
    }

    /// Look up a check by name; `None` for names outside the allow-list
    pub fn from_name(name: &str) -> Option<Format> {
        Format::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether `value` is acceptable for this format. Never mutates anything.
    pub fn check(&self, value: &Value) -> bool {
        match (self, value) {
            (Format::Int, Value::Int(_)) => true,
            (Format::Float, Value::Int(_)) => true,
            (Format::Float, Value::Float(f)) => f.is_finite(),
            (Format::Boolean, Value::Bool(_)) => true,
            (Format::Boolean, Value::Int(i)) => *i == 0 || *i == 1,
            (format, Value::Str(s)) => format.check_str(s),
            _ => false,
        }
    }

    fn check_str(&self, s: &str) -> bool {
        match self {
            Format::Url => is_url(s),
            Format::Email => is_email(s),
            Format::Ip => IpAddr::from_str(s).is_ok(),
            Format::Int => is_int(s.trim()),
            Format::Float => is_float(s.trim()),
            Format::Boolean => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes" | "0" | "false" | "off" | "no"
            ),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_int(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    // No leading zeros, except for zero itself
    if digits.len() > 1 && digits.starts_with('0') {
        return false;
    }
    i64::from_str(s).is_ok()
}

fn is_float(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };
    let mut parts = mantissa.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");
    if whole.is_empty() && fraction.is_empty() {
        return false;
    }
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return false;
    }
    if let Some(exponent) = exponent {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if exponent.is_empty() || !all_digits(exponent) {
            return false;
        }
    }
    f64::from_str(s).map(f64::is_finite).unwrap_or(false)
}

fn is_url(s: &str) -> bool {
    // The parser trims surrounding whitespace and repairs `http:/host`
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) || !s.contains("://") {
        return false;
    }
    Url::parse(s).map_or(false, |url| url.has_host())
}

fn is_hostname(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c));
    local_ok && domain.contains('.') && is_hostname(domain) && !domain.contains('_')
}
