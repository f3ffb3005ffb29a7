//! The typed value a parsed field ends up as.
//!
//! Every column parser, built in or custom, produces a [`Value`]. The
//! variants cover what the built-in parsers emit; custom parsers can
//! return any of them, including [`Value::Null`] to blank a field out.

use bigdecimal::BigDecimal;
use serde::Serialize;
use std::fmt;

/// A single parsed field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Produced by the `boolean` parser
    Bool(bool),
    /// Produced by the `integer` parser
    Integer(i64),
    /// Produced by the `decimal` parser
    Decimal(BigDecimal),
    /// Produced by the `string` and `raw` parsers
    String(String),
    /// An explicitly absent value, only ever produced by custom parsers
    Null,
}

impl Value {
    /// Returns the boolean if this value holds one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer if this value holds one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the decimal if this value holds one
    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::Decimal(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the string if this value holds one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// True for [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
            Value::Null => Ok(()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_integer(), Some(42));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_integer(), None);
        assert_eq!(Value::Integer(42).as_str(), None);
    }

    #[test]
    fn test_decimal_accessor() {
        let decimal = BigDecimal::from_str("42.42").unwrap();
        let value = Value::from(decimal.clone());
        assert_eq!(value.as_decimal(), Some(&decimal));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::from("kept  as-is").to_string(), "kept  as-is");
        assert_eq!(Value::Null.to_string(), "");
    }
}
