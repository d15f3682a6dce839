//! Scalar values carried by action arguments and results

use std::fmt;

/// A scalar argument or result value.
///
/// Arguments are rendered as text inside the request envelope. Result values
/// are coerced when decoded: text made only of ASCII digits becomes an
/// [`Value::Integer`], anything else stays [`Value::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(u64),
    Text(String),
}

impl Value {
    /// Coerce a raw text node into a value
    pub fn coerce(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            // Digit strings too long for u64 stay textual
            if let Ok(number) = raw.parse::<u64>() {
                return Value::Integer(number);
            }
        }
        Value::Text(raw.to_string())
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(number) => Some(*number),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Integer(_) => None,
        }
    }

    /// Interpret the value as a UPnP boolean (`1`/`0`, `true`/`false`, `yes`/`no`)
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Integer(1) => Some(true),
            Value::Integer(0) => Some(false),
            Value::Integer(_) => None,
            Value::Text(text) => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(number) => write!(f, "{}", number),
            Value::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Value::Text(text.clone())
    }
}

impl From<u64> for Value {
    fn from(number: u64) -> Self {
        Value::Integer(number)
    }
}

impl From<u32> for Value {
    fn from(number: u32) -> Self {
        Value::Integer(number.into())
    }
}

impl From<u16> for Value {
    fn from(number: u16) -> Self {
        Value::Integer(number.into())
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        match u64::try_from(number) {
            Ok(unsigned) => Value::Integer(unsigned),
            Err(_) => Value::Text(number.to_string()),
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Integer(u64::from(flag))
    }
}
